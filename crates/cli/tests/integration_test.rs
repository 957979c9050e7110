use std::fs;
use std::path::Path;
use std::process::Command;

use fear_greed_charts::ChartRenderer;
use fear_greed_cli::{run_pipeline, ReportFiles};
use fear_greed_core::AppConfig;

const CHART_FILES: [&str; 7] = [
    ChartRenderer::SENTIMENT_DISTRIBUTION,
    ChartRenderer::PROFIT_BY_SENTIMENT,
    ChartRenderer::WIN_RATE_BY_SENTIMENT,
    ChartRenderer::SENTIMENT_TIME_SERIES,
    ChartRenderer::TRADE_SIZE_VS_SENTIMENT,
    ChartRenderer::CORRELATION_HEATMAP,
    ChartRenderer::VOLUME_BY_SENTIMENT,
];

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

const TRADES_CSV: &str = "\
Account,Coin,Execution Price,Size Tokens,Size USD,Side,Timestamp IST,Start Position,Direction,Closed PnL,Transaction Hash,Order ID,Crossed,Fee,Trade ID,Timestamp
0xaaa,BTC,42000,0.01,420,BUY,01-01-2024 09:15,0,Open Long,0,0xh1,1,TRUE,0.1,1,1704080700000
0xaaa,BTC,42500,0.01,425,SELL,01-01-2024 18:40,0.01,Close Long,5,0xh2,2,TRUE,0.1,2,1704114600000
0xbbb,ETH,2300,1,2300,SELL,02-01-2024 11:05,0,Open Short,-12.5,0xh3,3,FALSE,0.5,3,1704173700000
0xbbb,ETH,2280,1,2280,BUY,04-01-2024 07:30,-1,Close Short,20,0xh4,4,TRUE,0.5,4,1704333600000
0xccc,SOL,101,10,n/a,BUY,04-01-2024 21:00,0,Open Long,bad,0xh5,5,TRUE,0.2,5,1704382200000
";

const SENTIMENT_CSV: &str = "\
timestamp,value,classification,date
1704067200,22,Extreme Fear,2024-01-01
1704153600,41,Fear,2024-01-02
1704240000,52,Neutral,2024-01-03
1704326400,71,Greed,2024-01-04
";

fn write_fixtures(root: &Path) -> AppConfig {
    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("historical_data.csv"), TRADES_CSV).unwrap();
    fs::write(data_dir.join("fear_greed_index.csv"), SENTIMENT_CSV).unwrap();

    let mut config = AppConfig::default();
    config.paths.data_dir = data_dir;
    config.paths.output_dir = root.join("output");
    config.charts.enabled = false;
    config
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

#[test]
fn test_pipeline_writes_all_reports() {
    let root = tempfile::tempdir().unwrap();
    let config = write_fixtures(root.path());

    let summary = run_pipeline(&config, false).expect("Pipeline failed");

    assert_eq!(summary.trade_count, 5);
    assert_eq!(summary.sentiment_count, 4);
    assert_eq!(summary.merged_count, 5);
    assert_eq!(summary.overall.total_trades, 5);
    assert_eq!(summary.overall.profitable_trades, 2);
    assert!((summary.overall.total_profit - 12.5).abs() < 1e-9);
    assert!(summary.charts.is_empty());

    for name in ReportFiles::ALL {
        let path = config.paths.output_dir.join(name);
        assert!(path.exists(), "missing report {name}");
        let (header, rows) = read_csv(&path);
        assert!(!header.is_empty(), "empty header in {name}");
        assert!(!rows.is_empty(), "no rows in {name}");
    }
}

#[test]
fn test_sentiment_performance_report_contents() {
    let root = tempfile::tempdir().unwrap();
    let config = write_fixtures(root.path());

    run_pipeline(&config, false).unwrap();

    let (header, rows) = read_csv(
        &config
            .paths
            .output_dir
            .join(ReportFiles::SENTIMENT_PERFORMANCE),
    );
    assert_eq!(header[0], "classification");
    assert_eq!(header[1], "total_trades");
    assert_eq!(header.last().map(String::as_str), Some("profit_factor"));

    let keys: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(keys, vec!["Extreme Fear", "Fear", "Greed"]);

    let extreme_fear = &rows[0];
    assert_eq!(extreme_fear[1], "2");
    assert_eq!(extreme_fear[9], "inf");
}

#[test]
fn test_side_percentages_sum_to_one() {
    let root = tempfile::tempdir().unwrap();
    let config = write_fixtures(root.path());

    run_pipeline(&config, false).unwrap();

    let (header, rows) = read_csv(
        &config
            .paths
            .output_dir
            .join(ReportFiles::SIDE_BY_SENTIMENT_PCT),
    );
    assert_eq!(header, vec!["classification", "BUY", "SELL"]);
    for row in rows {
        let total: f64 = row[1..].iter().map(|v| v.parse::<f64>().unwrap()).sum();
        assert!((total - 1.0).abs() < 1e-9, "row {row:?} sums to {total}");
    }
}

/// Chart text needs a system font; hosts without one skip the chart test.
fn system_fonts_available() -> bool {
    ["/usr/share/fonts", "/usr/local/share/fonts", "/System/Library/Fonts", "C:\\Windows\\Fonts"]
        .iter()
        .any(|dir| fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_some()))
}

#[test]
fn test_pipeline_renders_and_replaces_charts() {
    if !system_fonts_available() {
        return;
    }

    let root = tempfile::tempdir().unwrap();
    let mut config = write_fixtures(root.path());
    config.charts.enabled = true;
    config.charts.pixels_per_inch = 40;

    let summary = run_pipeline(&config, true).expect("Pipeline with charts failed");

    assert_eq!(summary.charts.len(), CHART_FILES.len());
    for name in CHART_FILES {
        let path = config.paths.output_dir.join(name);
        assert!(summary.charts.contains(&path), "{name} not reported");
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(&PNG_SIGNATURE), "{name} is not a PNG");
        fs::write(&path, b"stale").unwrap();
    }

    let rerun = run_pipeline(&config, true).expect("Second pipeline run failed");

    assert_eq!(rerun.charts.len(), CHART_FILES.len());
    for name in CHART_FILES {
        let bytes = fs::read(config.paths.output_dir.join(name)).unwrap();
        assert!(bytes.starts_with(&PNG_SIGNATURE), "{name} was not rewritten");
    }
    let pngs = fs::read_dir(&config.paths.output_dir)
        .unwrap()
        .filter(|entry| {
            entry
                .as_ref()
                .is_ok_and(|e| e.path().extension().is_some_and(|ext| ext == "png"))
        })
        .count();
    assert_eq!(pngs, CHART_FILES.len());
}

#[test]
fn test_missing_trade_file_fails() {
    let root = tempfile::tempdir().unwrap();
    let mut config = write_fixtures(root.path());
    config.paths.trades_file = "absent.csv".to_string();

    let err = run_pipeline(&config, false).unwrap_err();

    assert!(err.to_string().contains("Failed to load trades"));
}

#[test]
fn test_binary_run_skip_charts() {
    let root = tempfile::tempdir().unwrap();
    let config = write_fixtures(root.path());
    let config_path = root.path().join("Config.toml");
    fs::write(
        &config_path,
        format!(
            "[paths]\ndata_dir = {:?}\noutput_dir = {:?}\n",
            config.paths.data_dir.display().to_string(),
            config.paths.output_dir.display().to_string()
        ),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_fear-greed"))
        .arg("run")
        .arg("--config")
        .arg(&config_path)
        .arg("--skip-charts")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total Trades:          5"));
    assert!(stdout.contains("Analysis complete!"));
    assert!(config
        .paths
        .output_dir
        .join(ReportFiles::SENTIMENT_CORRELATIONS)
        .exists());
}
