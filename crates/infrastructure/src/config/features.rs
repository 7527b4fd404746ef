//! Background tasks, frontend assets and soft-delete retention.

use serde::{Deserialize, Serialize};

/// Background task execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Worker threads for the async runtime (`TASK_WORKERS`)
    #[serde(default = "default_workers")]
    pub workers: usize,
}

const fn default_workers() -> usize {
    1
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

/// Frontend asset serving
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Development mode (`DEBUG`)
    #[serde(default)]
    pub debug: bool,

    /// Port of the Vite dev server (`DJANGO_VITE_DEV_SERVER_PORT`)
    #[serde(default = "default_vite_port")]
    pub dev_server_port: u16,
}

const fn default_vite_port() -> u16 {
    5173
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            debug: false,
            dev_server_port: default_vite_port(),
        }
    }
}

/// Retention of soft-deleted transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftDeleteConfig {
    /// Keep deleted transactions instead of removing them (`ENABLE_SOFT_DELETE`)
    #[serde(default)]
    pub enabled: bool,

    /// Days to keep them; 0 keeps them indefinitely (`KEEP_DELETED_TRANSACTIONS_FOR`)
    #[serde(default = "default_keep_days")]
    pub keep_deleted_for_days: u32,
}

const fn default_keep_days() -> u32 {
    365
}

impl SoftDeleteConfig {
    /// Retention period, `None` when deleted records are kept forever
    #[must_use]
    pub const fn retention_days(&self) -> Option<u32> {
        if self.keep_deleted_for_days == 0 {
            None
        } else {
            Some(self.keep_deleted_for_days)
        }
    }
}

impl Default for SoftDeleteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            keep_deleted_for_days: default_keep_days(),
        }
    }
}
