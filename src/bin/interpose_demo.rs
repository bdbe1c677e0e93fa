//! interpose-demo: logging advice around an employee service
//!
//! Wires the default rule table (or the configured one) around an in-memory
//! employee service and exercises each advised operation once.
//!
//! ## Configuration
//! - INTERPOSE_CONFIG: Path to a YAML config file (optional)
//! - INTERPOSE_LOG: Log filter (default: `log.filter` from config, then "info")
//!
//! Run with `INTERPOSE_LOG=debug` to see the advice output.

use std::sync::Arc;

use tracing::{info, warn};

use interpose::advice::{AdviceRegistry, Advised};
use interpose::config::Config;
use interpose::employee::{Employee, MockEmployeeService};
use interpose::logging;
use interpose::sink::TracingSink;
use interpose::utils::bootstrap::init_tracing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(None)?;
    init_tracing(&config.log.filter);

    let rules = config.rules()?;
    let mut registry = AdviceRegistry::new(Arc::new(TracingSink::new()));
    logging::install(&mut registry, &rules)?;
    info!(rules = rules.len(), type_name = %config.advice.type_name, "advice installed");

    let service = Advised::new(
        MockEmployeeService::new(),
        config.advice.type_name.as_str(),
        Arc::new(registry),
    );

    let added = service.add_employee("Alice", 5000)?;
    info!(added, "addEmployee completed");

    let employee = service.get_employee_by_id(1)?;
    info!(employee = %employee, "getEmployeeById completed");

    let deleted = service.delete_employee(1)?;
    info!(deleted, "deleteEmployee completed");

    match service.update_employee(Employee::new(42, "Nobody", 0)) {
        Ok(updated) => info!(employee = %updated, "updateEmployee completed"),
        Err(e) => warn!(error = %e, "updateEmployee failed"),
    }

    Ok(())
}
