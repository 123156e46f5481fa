use std::path::PathBuf;

use clap::Parser;
use robot_rag::cli::{Cli, Commands};
use robot_rag::ArtifactFormat;

#[test]
fn test_parse_build_with_overrides() {
    let cli = Cli::try_parse_from([
        "robot-rag",
        "build",
        "--data-dir",
        "corpus",
        "--output",
        "out/index.bin",
        "--chunk-size",
        "500",
        "--chunk-overlap",
        "50",
        "--format",
        "json",
        "-e",
        "txt",
        "-e",
        "md",
    ])
    .unwrap();

    match cli.command {
        Commands::Build(args) => {
            assert_eq!(args.data_dir, Some(PathBuf::from("corpus")));
            assert_eq!(args.output, Some(PathBuf::from("out/index.bin")));
            assert_eq!(args.chunk_size, Some(500));
            assert_eq!(args.chunk_overlap, Some(50));
            assert_eq!(args.format, Some(ArtifactFormat::Json));
            assert_eq!(args.extensions, vec!["txt".to_string(), "md".to_string()]);
            assert!(args.model.is_none());
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_build_defaults_to_config() {
    let cli = Cli::try_parse_from(["robot-rag", "build"]).unwrap();
    match cli.command {
        Commands::Build(args) => {
            assert!(args.data_dir.is_none());
            assert!(args.format.is_none());
            assert!(args.extensions.is_empty());
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_query_with_scores() {
    let cli = Cli::try_parse_from([
        "robot-rag",
        "query",
        "where is the dock",
        "-k",
        "2",
        "--max-chars",
        "400",
        "--scores",
        "--json",
    ])
    .unwrap();

    assert!(cli.json);
    match cli.command {
        Commands::Query(args) => {
            assert_eq!(args.text, "where is the dock");
            assert_eq!(args.retrieval.top_k, Some(2));
            assert_eq!(args.retrieval.max_chars, Some(400));
            assert!(args.scores);
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_prompt_and_global_config() {
    let cli = Cli::try_parse_from([
        "robot-rag",
        "--config",
        "robot.yaml",
        "prompt",
        "hello there",
        "--index",
        "idx.bin",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("robot.yaml")));
    match cli.command {
        Commands::Prompt(args) => {
            assert_eq!(args.question, "hello there");
            assert_eq!(args.retrieval.index, Some(PathBuf::from("idx.bin")));
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_inspect() {
    let cli = Cli::try_parse_from(["robot-rag", "inspect", "-i", "idx.bin"]).unwrap();
    match cli.command {
        Commands::Inspect(args) => assert_eq!(args.index, Some(PathBuf::from("idx.bin"))),
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_invalid_format_is_rejected() {
    assert!(Cli::try_parse_from(["robot-rag", "build", "--format", "xml"]).is_err());
}

#[test]
fn test_query_requires_text() {
    assert!(Cli::try_parse_from(["robot-rag", "query"]).is_err());
}
