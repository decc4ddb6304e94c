use std::fs;
use std::path::Path;

use clap::Parser;
use serde_json::{json, Value};
use tempfile::TempDir;
use uuid::Uuid;

use tally_cli::{execute, Cli};

fn write_dataset(dir: &Path) -> std::path::PathBuf {
    let customer_a = Uuid::new_v4().to_string();
    let customer_b = Uuid::new_v4().to_string();

    let dataset = json!({
        "suppliers": [{ "id": "sup-1", "name": "Orchard Co" }],
        "product_types": [{ "id": "pt-fruit", "name": "Fruit" }],
        "products": [
            { "id": "prod-apple", "name": "Apple", "product_type_id": "pt-fruit" }
        ],
        "customers": [
            { "id": customer_a, "name": "Io" },
            { "id": customer_b, "name": "Rhea" }
        ],
        "campaigns": [
            {
                "id": "gb-1",
                "name": "Apples",
                "launch_date": "2025-04-07",
                "supplier_id": "sup-1",
                "product_id": "prod-apple",
                "units": [
                    { "id": "u1", "label": "5kg box", "price": "10.00", "cost_price": "6.00" }
                ]
            },
            {
                "id": "gb-2",
                "name": "Apples",
                "launch_date": "2025-04-09",
                "supplier_id": "sup-1",
                "product_id": "prod-apple",
                "units": [
                    { "id": "u1", "label": "5kg box", "price": "10.00", "cost_price": "6.00" }
                ]
            }
        ],
        "orders": [
            {
                "id": "o1", "campaign_id": "gb-1", "unit_id": "u1",
                "customer_id": customer_a, "quantity": 2, "status": "PAID"
            },
            {
                "id": "o2", "campaign_id": "gb-1", "unit_id": "u1",
                "customer_id": customer_b, "quantity": 2, "status": "PAID",
                "partial_refund_amount": "4.00"
            },
            {
                "id": "o3", "campaign_id": "gb-2", "unit_id": "u1",
                "customer_id": customer_a, "quantity": 2, "status": "COMPLETED"
            },
            {
                "id": "o4", "campaign_id": "gb-2", "unit_id": "u1",
                "customer_id": customer_b, "quantity": 2, "status": "REFUNDED"
            }
        ]
    });

    let path = dir.join("extract.json");
    fs::write(&path, dataset.to_string()).expect("write dataset");
    path
}

fn run(args: &[&str]) -> Value {
    let cli = Cli::try_parse_from(args).expect("args parse");
    let output = execute(cli).expect("command runs");
    serde_json::from_str(&output).expect("output is JSON")
}

#[test]
fn overview_reports_the_ledger_totals() {
    let dir = TempDir::new().expect("temp dir");
    let data = write_dataset(dir.path());

    let payload = run(&["tally", "--data", data.to_str().expect("utf-8 path"), "overview"]);

    assert_eq!(payload["totals"]["revenue"], "56.00");
    assert_eq!(payload["totals"]["profit"], "8.00");
    assert_eq!(payload["totals"]["refund_amount"], "24.00");
    assert_eq!(payload["totals"]["order_count"], 3);
    assert_eq!(payload["totals"]["partial_refund_orders"], 1);
    assert_eq!(payload["totals"]["full_refund_orders"], 1);
    assert_eq!(payload["totals"]["campaign_count"], 2);
    assert_eq!(payload["trend"]["bucket_days"], 1);
}

#[test]
fn campaigns_merge_same_named_groups() {
    let dir = TempDir::new().expect("temp dir");
    let data = write_dataset(dir.path());
    let data = data.to_str().expect("utf-8 path");

    let merged = run(&["tally", "--data", data, "campaigns", "--merge"]);
    assert_eq!(merged["total_count"], 1);
    assert_eq!(merged["data"][0]["name"], "Apples");
    assert_eq!(merged["data"][0]["campaign_count"], 2);
    assert_eq!(merged["data"][0]["supplier_name"], "Orchard Co");

    let separate = run(&["tally", "--data", data, "campaigns"]);
    assert_eq!(separate["total_count"], 2);
}

#[test]
fn window_filter_limits_the_rows_in_scope() {
    let dir = TempDir::new().expect("temp dir");
    let data = write_dataset(dir.path());

    let payload = run(&[
        "tally",
        "--data",
        data.to_str().expect("utf-8 path"),
        "overview",
        "--start",
        "2025-04-01",
        "--end",
        "2025-04-08",
    ]);

    // only gb-1 launches inside the window
    assert_eq!(payload["totals"]["campaign_count"], 1);
    assert_eq!(payload["totals"]["revenue"], "36.00");
    // explicit window materializes every day in range
    assert_eq!(
        payload["trend"]["orders"]["series"].as_array().map(Vec::len),
        Some(8)
    );
}

#[test]
fn product_roll_up_and_pagination_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let data = write_dataset(dir.path());

    let payload = run(&[
        "tally",
        "--data",
        data.to_str().expect("utf-8 path"),
        "products",
        "--page",
        "1",
        "--page-size",
        "5",
    ]);

    assert_eq!(payload["total_count"], 1);
    assert_eq!(payload["page_size"], 5);
    assert_eq!(payload["data"][0]["name"], "Apple");
    assert_eq!(payload["data"][0]["campaign_count"], 2);
}

#[test]
fn missing_window_bound_is_a_usage_error() {
    let dir = TempDir::new().expect("temp dir");
    let data = write_dataset(dir.path());

    let cli = Cli::try_parse_from([
        "tally",
        "--data",
        data.to_str().expect("utf-8 path"),
        "overview",
        "--start",
        "2025-04-01",
    ])
    .expect("args parse");

    let error = execute(cli).expect_err("half-open window rejected");
    assert!(error.to_string().contains("--start and --end"));
}

#[test]
fn missing_dataset_path_is_reported() {
    let cli = Cli::try_parse_from(["tally", "overview"]).expect("args parse");
    let error = execute(cli).expect_err("no dataset configured");
    assert!(error.to_string().contains("--data"));
}
