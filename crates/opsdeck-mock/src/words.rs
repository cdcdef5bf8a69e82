// Word pools for fixture generation.

pub const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Amara", "Ana", "Bjorn", "Camille", "Chen", "Dara", "Diego", "Elena", "Emeka",
    "Farah", "Felix", "Grace", "Hana", "Hugo", "Imani", "Ines", "Jonas", "Kai", "Kofi", "Lara",
    "Leo", "Lina", "Malik", "Maya", "Mei", "Nadia", "Noah", "Olga", "Omar", "Priya", "Quinn",
    "Rafael", "Rosa", "Sami", "Sofia", "Tariq", "Tess", "Uma", "Victor", "Wren", "Yara", "Yusuf",
    "Zoe",
];

pub const LAST_NAMES: &[&str] = &[
    "Abbott", "Alvarez", "Bauer", "Becker", "Castillo", "Chowdhury", "Dubois", "Eriksen", "Fischer",
    "Garcia", "Haddad", "Ivanova", "Jansen", "Kim", "Kowalski", "Larsen", "Lindqvist", "Mendes",
    "Moreau", "Nakamura", "Novak", "Okafor", "Olsen", "Patel", "Petrov", "Quispe", "Rossi",
    "Schmidt", "Silva", "Tanaka", "Ueda", "Vargas", "Walsh", "Weber", "Xu", "Yilmaz", "Zhang",
];

pub const JOB_TITLES: &[&str] = &[
    "Site Reliability Engineer",
    "Platform Engineer",
    "Data Analyst",
    "Product Manager",
    "Security Engineer",
    "Support Specialist",
    "Engineering Manager",
    "Backend Developer",
    "Frontend Developer",
    "Database Administrator",
    "Release Coordinator",
    "QA Engineer",
    "Solutions Architect",
    "Technical Writer",
];

pub const EMAIL_DOMAINS: &[&str] = &[
    "example.com",
    "example.org",
    "mail.test",
    "corp.test",
    "inbox.example",
];

pub const JOB_ADJECTIVES: &[&str] = &[
    "Nightly", "Hourly", "Weekly", "Daily", "Monthly", "Quarterly", "Incremental", "Full", "Rolling",
    "Scheduled",
];

pub const JOB_SUBJECTS: &[&str] = &[
    "Invoice", "Database", "Cache", "Report", "Metrics", "Audit Log", "Search Index", "Backup",
    "Newsletter", "Certificate", "Inventory", "Payroll",
];

pub const JOB_ACTIONS: &[&str] = &[
    "Sync", "Export", "Cleanup", "Rotation", "Rebuild", "Digest", "Snapshot", "Reconciliation",
    "Purge", "Refresh",
];
