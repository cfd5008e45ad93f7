// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fs;
use std::path::{Path, PathBuf};

use popularity_league_core::dynamic_phase_executor::DynamicPhaseExecutor;
use popularity_league_core::flat_file_count_table::FlatFileCountTable;
use popularity_league_core::orchestrator::Orchestrator;
use popularity_league_core::{CountTableBackend, LeagueError, Phase, PipelineConfig, RankOrder};
use popularity_league_task_channels::channel_worker_factory::ChannelWorkerFactory;
use popularity_league_task_channels::pipeline::ChannelOrchestrator;
use popularity_league_task_channels::{run_pipeline, TokenShutdownSignal};
use tempfile::{tempdir, TempDir};
use tokio_util::sync::CancellationToken;

struct Fixture {
    dir: TempDir,
    config: PipelineConfig,
}

impl Fixture {
    fn new(corpus: &str, league: &str) -> Self {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("links.txt"), corpus).unwrap();
        fs::write(dir.path().join("league.txt"), league).unwrap();
        let config = PipelineConfig {
            league_path: Some(dir.path().join("league.txt")),
            work_dir: dir.path().join("work"),
            split_size: 1,
            num_mappers: 2,
            num_reducers: 2,
            num_partitions: 3,
            num_filters: 2,
            ..PipelineConfig::default()
        };
        Self { dir, config }
    }

    fn input(&self) -> PathBuf {
        self.dir.path().join("links.txt")
    }

    fn output(&self) -> PathBuf {
        self.dir.path().join("out/ranking.tsv")
    }

    async fn run(&self) -> popularity_league_core::Result<String> {
        run_pipeline(
            &self.config,
            &self.input(),
            &self.output(),
            TokenShutdownSignal::default(),
        )
        .await?;
        Ok(fs::read_to_string(self.output()).unwrap())
    }
}

#[tokio::test]
async fn test_three_page_corpus() {
    let fixture = Fixture::new("1 2 3\n2 3\n3\n", "1\n2\n3\n");

    assert_eq!(fixture.run().await.unwrap(), "1\t0\n2\t1\n3\t2\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_tied_pages_share_rank() {
    let fixture = Fixture::new("1 5 7 9\n2: 5, 7\n3 (5) (7)\n", "5\n7\n9\n");

    assert_eq!(fixture.run().await.unwrap(), "9\t0\n5\t1\n7\t1\n");
}

#[tokio::test]
async fn test_league_member_missing_from_corpus_is_omitted() {
    let fixture = Fixture::new("1 2 3\n2 3\n3\n", "1\n2\n99\n");

    assert_eq!(fixture.run().await.unwrap(), "1\t0\n2\t1\n");
}

#[tokio::test]
async fn test_descending_order_ranks_most_referenced_first() {
    let mut fixture = Fixture::new("1 5 7 9\n2 5 7\n3 5 7\n", "5\n7\n9\n");
    fixture.config.rank_order = RankOrder::Descending;

    assert_eq!(fixture.run().await.unwrap(), "5\t0\n7\t0\n9\t2\n");
}

#[tokio::test]
async fn test_empty_corpus_writes_empty_ranking() {
    let fixture = Fixture::new("", "1\n2\n");

    assert_eq!(fixture.run().await.unwrap(), "");
}

#[tokio::test]
async fn test_more_splits_than_workers() {
    let corpus: String = (1..=200)
        .map(|source| format!("{} {} {}\n", source, source % 10, source % 4))
        .collect();
    let mut fixture = Fixture::new(&corpus, "0\n1\n2\n3\n4\n5\n");
    fixture.config.num_mappers = 3;
    fixture.config.num_reducers = 1;
    fixture.config.num_partitions = 7;
    fixture.config.num_filters = 1;

    // Same ranking as a single split in a single partition
    let parallel = fixture.run().await.unwrap();

    fixture.config.num_mappers = 1;
    fixture.config.split_size = 1000;
    fixture.config.num_partitions = 1;
    assert_eq!(fixture.run().await.unwrap(), parallel);
    assert_eq!(parallel.lines().count(), 6);
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let fixture = Fixture::new("4 1 2\n1 2 3\n2 3\n3\n", "1\n2\n3\n4\n");

    let first = fixture.run().await.unwrap();
    let second = fixture.run().await.unwrap();

    assert_eq!(first, "4\t0\n1\t1\n2\t2\n3\t2\n");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_sled_count_table_gives_same_ranking() {
    let mut fixture = Fixture::new("1 2 3\n2 3\n3\n", "1\n2\n3\n");
    fixture.config.count_table = CountTableBackend::Sled;

    assert_eq!(fixture.run().await.unwrap(), "1\t0\n2\t1\n3\t2\n");
    assert!(fixture.dir.path().join("work/counts.sled").exists());
}

#[tokio::test]
async fn test_malformed_token_aborts_without_output() {
    let fixture = Fixture::new("1 2\n3 x4\n5 6\n", "1\n2\n");

    let err = fixture.run().await.unwrap_err();

    match &err {
        LeagueError::PhaseFailed { phase, source, .. } => {
            assert_eq!(*phase, Phase::Map);
            assert!(matches!(source.as_ref(), LeagueError::Parse { token, .. } if token == "x4"));
        }
        other => panic!("Expected map phase failure, got {other:?}"),
    }
    assert!(err.to_string().contains("links.txt:2: malformed integer \"x4\""));
    assert!(!fixture.output().exists());
}

#[tokio::test]
async fn test_failed_rerun_removes_previous_ranking() {
    let fixture = Fixture::new("1 2 3\n2 3\n3\n", "1\n2\n3\n");
    assert_eq!(fixture.run().await.unwrap(), "1\t0\n2\t1\n3\t2\n");

    fs::write(fixture.input(), "1 2 3\n2 bad\n").unwrap();
    let err = fixture.run().await.unwrap_err();

    assert!(matches!(err, LeagueError::PhaseFailed { phase: Phase::Map, .. }));
    assert!(!fixture.output().exists());
}

#[tokio::test]
async fn test_invalid_utf8_corpus_line_is_reported_with_location() {
    let fixture = Fixture::new("", "1\n");
    fs::write(fixture.input(), b"1 2\n3 \xff4\n").unwrap();

    match fixture.run().await.unwrap_err() {
        LeagueError::Parse { location, .. } => {
            assert!(location.source.ends_with("links.txt"));
            assert_eq!(location.line, 2);
        }
        other => panic!("Expected parse error, got {other:?}"),
    }
    assert!(!fixture.output().exists());
}

#[tokio::test]
async fn test_zero_partitions_rejected_before_counting() {
    let mut fixture = Fixture::new("1 2\n", "1\n");
    fixture.config.num_partitions = 0;
    let shutdown = TokenShutdownSignal::default();
    let mut orchestrator: ChannelOrchestrator = Orchestrator::new(
        ChannelWorkerFactory::new(shutdown.clone()),
        DynamicPhaseExecutor::new(shutdown.clone()),
        shutdown,
    );
    let table = FlatFileCountTable::new(fixture.config.count_table_path());

    let err = orchestrator
        .count_links(&fixture.config, Vec::new(), &table)
        .await
        .unwrap_err();

    assert!(matches!(err, LeagueError::Configuration(_)));
    assert!(!fixture.config.count_table_path().exists());
}

#[tokio::test]
async fn test_malformed_league_aborts_without_output() {
    let fixture = Fixture::new("1 2\n", "1\ntwo\n");

    match fixture.run().await.unwrap_err() {
        LeagueError::Parse { location, token } => {
            assert_eq!(token, "two");
            assert_eq!(location.line, 2);
        }
        other => panic!("Expected league parse error, got {other:?}"),
    }
    assert!(!fixture.output().exists());
}

#[tokio::test]
async fn test_missing_inputs_are_reported() {
    let mut fixture = Fixture::new("1 2\n", "1\n");
    fixture.config.league_path = Some(fixture.dir.path().join("absent.txt"));

    assert!(matches!(
        fixture.run().await.unwrap_err(),
        LeagueError::MissingResource { role: "league", .. }
    ));

    let err = run_pipeline(
        &fixture.config,
        Path::new("/nonexistent/corpus"),
        &fixture.output(),
        TokenShutdownSignal::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, LeagueError::MissingResource { role: "corpus", .. }));
}

#[tokio::test]
async fn test_cancelled_run_writes_nothing() {
    let fixture = Fixture::new("1 2 3\n2 3\n3\n", "1\n2\n3\n");
    let token = CancellationToken::new();
    token.cancel();

    let err = run_pipeline(
        &fixture.config,
        &fixture.input(),
        &fixture.output(),
        TokenShutdownSignal::new(token),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, LeagueError::Cancelled));
    assert!(!fixture.output().exists());
}
