// Column layouts for the two dashboard tables.

use crate::table::column::{ColumnDef, EnumOption};

pub const STATUS_OPTIONS: &[EnumOption] = &[
    EnumOption {
        value: "active",
        label: "Active",
    },
    EnumOption {
        value: "inactive",
        label: "Inactive",
    },
];

pub const ROLE_OPTIONS: &[EnumOption] = &[
    EnumOption {
        value: "admin",
        label: "Admin",
    },
    EnumOption {
        value: "user",
        label: "User",
    },
];

/// Scheduler: cron jobs.
pub const CRON_JOB_COLUMNS: &[ColumnDef] = &[
    ColumnDef::date("createdAt", "Created At", 14),
    ColumnDef::text("name", "Name", 32),
    ColumnDef::searchable("email", "Email", 32),
    ColumnDef::enumerated("status", "Status", STATUS_OPTIONS, 10),
    ColumnDef::action("action", 6),
];

/// User management: users.
pub const USER_COLUMNS: &[ColumnDef] = &[
    ColumnDef::enumerated("role", "Role", ROLE_OPTIONS, 8),
    ColumnDef::text("name", "Name", 24),
    ColumnDef::text("jobTitle", "Job Title", 28),
    ColumnDef::searchable("email", "Email", 32),
    ColumnDef::date("createdAt", "Created At", 14),
    ColumnDef::action("action", 6),
];
