use anyhow::Result;
use fms_client::FmsClient;
use fms_core::config::Config;

use crate::output::{print_json, print_table};

/// List a trip's tasks.
pub fn run(config: Config, trip_no: &str, json: bool) -> Result<()> {
    let client = FmsClient::new(config)?;
    let rt = tokio::runtime::Runtime::new()?;
    let tasks = rt.block_on(client.list_tasks(trip_no.trim()))?;

    if json {
        return print_json(&serde_json::json!({ "tripNo": trip_no.trim(), "tasks": tasks }));
    }

    if tasks.is_empty() {
        println!("No tasks for trip {}.", trip_no.trim());
        return Ok(());
    }

    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                t.task_number().map(|n| n.to_string()).unwrap_or_default(),
                t.task_type().to_string(),
                t.order_number().to_string(),
                t.tracking_number().to_string(),
                t.pickup_number().to_string(),
                t.status_text().to_string(),
                if t.is_complete() { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    print_table(&["TASK", "TYPE", "DO", "PRO", "PU", "STATUS", "DONE"], &rows);
    Ok(())
}
