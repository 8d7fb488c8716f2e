//! Testing utilities for the envmon workspace
//!
//! Scripted fakes for the two external services plus shared fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use envmon_access::{Action, Capability, NavNode, NavigationModel, Resource};
use envmon_reference::{CollectionSource, FetchError, MonitorTypeGroups, MonitorTypes, Monitors, ResourceKind, Tables};
use envmon_session::{AuthService, AuthenticationError, Credentials, User};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

pub const PASSWORD: &str = "secret1";

/// Collection source answering from per-path scripts
///
/// Responses are consumed in order; the last one for a path is repeated.
/// Unscripted paths answer 404.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    scripts: Mutex<HashMap<String, VecDeque<Result<Value, FetchError>>>>,
    calls: Mutex<HashMap<String, usize>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source whose fetches wait for [`release`](Self::release)
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    /// Source answering every reference path with the fixtures below
    pub fn standard() -> Self {
        let source = Self::new();
        source.respond(Monitors::PATH, monitors_json());
        source.respond(MonitorTypes::PATH, monitor_types_json());
        source.respond(MonitorTypeGroups::PATH, monitor_type_groups_json());
        source.respond(Tables::PATH, tables_json());
        source
    }

    pub fn respond(&self, path: &str, body: Value) -> &Self {
        self.push(path, Ok(body))
    }

    pub fn fail(&self, path: &str, error: FetchError) -> &Self {
        self.push(path, Err(error))
    }

    fn push(&self, path: &str, response: Result<Value, FetchError>) -> &Self {
        self.scripts
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Let `n` gated fetches through
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Fetches started for `path`, gated or not
    pub fn calls(&self, path: &str) -> usize {
        self.calls.lock().get(path).copied().unwrap_or(0)
    }

    fn next(&self, path: &str) -> Result<Value, FetchError> {
        let mut scripts = self.scripts.lock();
        let Some(queue) = scripts.get_mut(path) else {
            return Err(FetchError::status(path, 404));
        };
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.unwrap_or_else(|| Err(FetchError::status(path, 404)))
    }
}

#[async_trait]
impl CollectionSource for ScriptedSource {
    async fn fetch(&self, path: &str) -> Result<Value, FetchError> {
        *self.calls.lock().entry(path.to_string()).or_insert(0) += 1;
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| FetchError::transport(path, e))?
                .forget();
        }
        self.next(path)
    }
}

/// Authentication service with a fixed account list
#[derive(Debug, Default)]
pub struct FakeAuth {
    accounts: Mutex<HashMap<String, (String, User)>>,
    offline: AtomicBool,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operator and administrator, both with [`PASSWORD`]
    pub fn standard() -> Self {
        Self::new()
            .with_account(operator_user(), PASSWORD)
            .with_account(admin_user(), PASSWORD)
    }

    pub fn with_account(self, user: User, password: &str) -> Self {
        self.accounts
            .lock()
            .insert(user.id.clone(), (password.to_string(), user));
        self
    }

    /// Make every call fail as unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuthService for FakeAuth {
    async fn authenticate(&self, credentials: &Credentials) -> Result<User, AuthenticationError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AuthenticationError::Unavailable("connection refused".into()));
        }
        match self.accounts.lock().get(&credentials.username) {
            Some((password, user)) if *password == credentials.password => Ok(user.clone()),
            _ => Err(AuthenticationError::Rejected),
        }
    }
}

/// Operator allowed to read data only
pub fn operator_user() -> User {
    User::new("operator", "Operator").with_capability(Capability::new(Action::Read, Resource::Data))
}

pub fn admin_user() -> User {
    User::new("admin", "Administrator").with_admin(true)
}

pub fn operator_credentials() -> Credentials {
    Credentials::new("operator", PASSWORD)
}

pub fn admin_credentials() -> Credentials {
    Credentials::new("admin", PASSWORD)
}

/// Query section with one data leaf and one alarm-setting leaf
pub fn query_section_model() -> NavigationModel {
    NavigationModel::new(vec![NavNode::section("數據查詢")
        .child(NavNode::leaf("歷史資料查詢", "history-data").requiring(Action::Read, Resource::Data))
        .child(NavNode::leaf("警報設定", "alarm-query").requiring(Action::Set, Resource::Alarm))])
}

pub fn monitors_json() -> Value {
    json!([
        {"_id": "M1", "desc": "Station A", "lat": 25.03, "lng": 121.56},
        {"_id": "M2", "desc": "Station B", "lat": 24.15, "lng": 120.67}
    ])
}

pub fn monitor_types_json() -> Value {
    json!([
        {"_id": "PM25", "desp": "PM2.5", "unit": "µg/m3", "prec": 0, "order": 1, "signalType": false, "std_law": 35.0},
        {"_id": "SO2", "desp": "二氧化硫", "unit": "ppb", "prec": 1, "order": 2, "signalType": false},
        {"_id": "DOOR", "desp": "門禁", "unit": "", "prec": 0, "order": 3, "signalType": true}
    ])
}

pub fn monitor_type_groups_json() -> Value {
    json!([
        {"_id": "air", "name": "空氣品質", "mts": ["PM25", "SO2"]}
    ])
}

pub fn tables_json() -> Value {
    json!(["hour_data", "min_data", "hour_data_raw", "calibration"])
}
