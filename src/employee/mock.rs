//! Mock EmployeeService implementation for testing.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::Failure;

use super::{Employee, EmployeeService};

#[derive(Debug, thiserror::Error)]
#[error("mock storage offline")]
struct StorageOffline;

#[derive(Debug, Default)]
struct Roster {
    employees: BTreeMap<u64, Employee>,
    next_id: u64,
    fail_on_add: bool,
    fail_on_delete: bool,
}

/// Mock employee service that stores employees in memory.
///
/// Ids are assigned sequentially from 1.
#[derive(Debug, Default)]
pub struct MockEmployeeService {
    roster: Mutex<Roster>,
}

impl MockEmployeeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_on_add(&self, fail: bool) {
        self.roster().fail_on_add = fail;
    }

    pub fn set_fail_on_delete(&self, fail: bool) {
        self.roster().fail_on_delete = fail;
    }

    pub fn len(&self) -> usize {
        self.roster().employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster().employees.is_empty()
    }

    fn roster(&self) -> MutexGuard<'_, Roster> {
        self.roster.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EmployeeService for MockEmployeeService {
    fn add_employee(&self, name: &str, salary: u64) -> Result<bool, Failure> {
        let mut roster = self.roster();
        if roster.fail_on_add {
            return Err(Failure::new("roster unavailable").with_cause(StorageOffline));
        }
        roster.next_id += 1;
        let id = roster.next_id;
        roster.employees.insert(id, Employee::new(id, name, salary));
        Ok(true)
    }

    fn delete_employee(&self, id: u64) -> Result<bool, Failure> {
        let mut roster = self.roster();
        if roster.fail_on_delete {
            return Err(Failure::new("roster unavailable"));
        }
        Ok(roster.employees.remove(&id).is_some())
    }

    fn update_employee(&self, employee: Employee) -> Result<Employee, Failure> {
        let mut roster = self.roster();
        match roster.employees.get_mut(&employee.id) {
            Some(existing) => {
                *existing = employee.clone();
                Ok(employee)
            }
            None => Err(Failure::new(format!("employee {} not found", employee.id))),
        }
    }

    fn get_employee_by_id(&self, id: u64) -> Result<Employee, Failure> {
        self.roster()
            .employees
            .get(&id)
            .cloned()
            .ok_or_else(|| Failure::new(format!("employee {id} not found")))
    }
}
