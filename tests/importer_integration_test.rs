// ==========================================
// 数据导入层集成测试
// ==========================================
// 覆盖: CSV 文件 → 领域实体 → 优化 → 导出 全链路
// ==========================================

use dairy_ration_opt::config::RunConfig;
use dairy_ration_opt::engine::RationOrchestrator;
use dairy_ration_opt::export::CsvExporter;
use dairy_ration_opt::importer::{CropImporter, HerdImporter, ImportError};
use dairy_ration_opt::logging;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn herd_csv(dir: &Path) -> PathBuf {
    write_file(
        dir,
        "cow.csv",
        "ID,DIM,MILK,DMI,NEL\n\
         C001,220,30.0,24.0,1.50\n\
         C002,200,32.0,24.5,1.55\n\
         C003,160,34.0,25.0,1.58\n\
         C004,120,36.0,25.0,1.60\n\
         C005,90,38.0,25.5,1.62\n\
         C006,60,40.0,26.0,1.65\n",
    )
}

fn library_csv(dir: &Path) -> PathBuf {
    write_file(
        dir,
        "crop.csv",
        "Ingredient,\"DM, % as fed\",NEL (Mcal/kg),\"CP, % DM\",\"NDF, % DM\",\"Starch, % DM\",\"Crude fat, % DM\",\"TFAs, % DM\",\"DNDF, %DM\",Role\n\
         Corn silage,35,1.45,8.8,45,20,3.2,2.5,28,forage\n\
         \"Legume silage, mid maturity\",42,1.27,20,42,2.5,2.8,2.0,21,forage\n\
         Corn grain,88,2.01,9.4,9.5,72,4.2,3.5,4,\n\
         Soybean meal,90,1.93,53,9.7,2,1.6,1.2,5,concentrate\n",
    )
}

fn prices_csv(dir: &Path) -> PathBuf {
    write_file(
        dir,
        "feed_price.csv",
        "Ingredient,price ($/kg)\n\
         Corn silage,0.06\n\
         \"Legume silage, mid maturity\",0.08\n\
         Corn grain,0.18\n\
         Soybean meal,0.40\n",
    )
}

fn limits_csv(dir: &Path) -> PathBuf {
    write_file(
        dir,
        "crop_min_max.csv",
        "Ingredient,min,max\n\
         Corn silage,0,40\n\
         \"Legume silage, mid maturity\",0,40\n\
         Corn grain,0,15\n\
         Soybean meal,0,8\n",
    )
}

// ==========================================
// 表文件导入
// ==========================================

#[test]
fn test_import_herd_from_csv() {
    let dir = tempdir().unwrap();
    let herd = HerdImporter::import(herd_csv(dir.path())).unwrap();
    assert_eq!(herd.len(), 6);
    assert_eq!(herd[0].cow_id, "C001");
    assert_eq!(herd[5].milk_yield, 40.0);
}

#[test]
fn test_import_library_converts_units_and_roles() {
    let dir = tempdir().unwrap();
    let library = CropImporter::import_library(library_csv(dir.path())).unwrap();
    assert_eq!(library.len(), 4);

    // 百分比 → 比例,NEL 原样
    let cs = library.get("Corn silage").unwrap();
    assert!((cs.dm - 0.35).abs() < 1e-12);
    assert!((cs.ndf - 0.45).abs() < 1e-12);
    assert!((cs.nel - 1.45).abs() < 1e-12);

    // 带逗号的配料名经引号解析完整保留
    assert!(library.contains("Legume silage, mid maturity"));

    // Role 空白 → concentrate,标注 forage 的两种青贮入粗饲料集
    assert_eq!(library.forages().len(), 2);
}

#[test]
fn test_import_missing_column_reported() {
    let dir = tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "cow_bad.csv",
        "ID,DIM,MILK,DMI\nC001,220,30.0,24.0\n",
    );
    let err = HerdImporter::import(path).unwrap_err();
    assert!(matches!(
        err,
        ImportError::MissingColumn { ref column, .. } if column == "NEL"
    ));
}

#[test]
fn test_import_unsupported_extension_rejected() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "cow.txt", "ID,DIM,MILK,DMI,NEL\n");
    let err = HerdImporter::import(path).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}

// ==========================================
// 文件 → 优化 → 导出 全链路
// ==========================================

#[test]
fn test_csv_to_results_pipeline() {
    logging::init_test();
    let dir = tempdir().unwrap();
    let herd = HerdImporter::import(herd_csv(dir.path())).unwrap();
    let library = CropImporter::import_library(library_csv(dir.path())).unwrap();
    let prices = CropImporter::import_prices(prices_csv(dir.path())).unwrap();
    let limits = CropImporter::import_limits(limits_csv(dir.path())).unwrap();

    let config = RunConfig {
        dm_vary: 0.02,
        nel_vary: 0.05,
        ..Default::default()
    };
    let report = RationOrchestrator::new(&library, &prices, &limits, &config)
        .run(&herd)
        .unwrap();
    assert_eq!(report.solved_count(), 1);

    let out_dir = dir.path().join("results");
    let written = CsvExporter::export_report(&report, &out_dir).unwrap();
    assert_eq!(written.len(), 2);

    let results = fs::read_to_string(out_dir.join("results_group1.csv")).unwrap();
    assert!(results.starts_with("Variable,Value"));
    assert!(results.contains("$/cow/d"));
    assert!(results.contains("methane (g/cow/d)"));

    let feed = fs::read_to_string(out_dir.join("feed_group1.csv")).unwrap();
    assert!(feed.starts_with("Ingredient,Amount as fed (kg/cow/d)"));
}
