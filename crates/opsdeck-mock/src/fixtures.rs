//! Seeded fixture generation.
//!
//! Each environment gets its own RNG stream derived from the environment
//! name, so a given `(environment, options)` pair always produces the same
//! users and cron jobs, and the three environments never share records.

use chrono::{DateTime, NaiveTime, SecondsFormat, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use opsdeck_api::{CronJob, Environment, JobStatus, Role, User};

use crate::words;

const DAY_SECS: i64 = 86_400;
/// Records are dated up to two years before the anchor.
const MAX_AGE_SECS: i64 = 730 * DAY_SECS;
const ADMIN_RATIO: f64 = 0.1;
const ACTIVE_RATIO: f64 = 0.9;

/// Knobs for a fixture run.
#[derive(Debug, Clone)]
pub struct FixtureOptions {
    /// Users per environment. Every user owns exactly one cron job.
    pub count: usize,
    /// "Now" for date generation; every `createdAt` lies before it.
    pub anchor: DateTime<Utc>,
    /// Mixed into every environment's seed.
    pub seed: u64,
}

impl FixtureOptions {
    pub fn new(count: usize, anchor: DateTime<Utc>) -> Self {
        Self {
            count,
            anchor,
            seed: 0,
        }
    }

    /// Options anchored at today's midnight UTC, stable for the whole day.
    pub fn today(count: usize) -> Self {
        let midnight = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        Self::new(count, midnight)
    }
}

/// Everything served for one environment.
#[derive(Debug, Clone)]
pub struct FixtureSet {
    pub users: Vec<User>,
    pub cron_jobs: Vec<CronJob>,
}

/// Generate the fixture set for one environment.
pub fn generate(env: Environment, opts: &FixtureOptions) -> FixtureSet {
    let mut rng = StdRng::seed_from_u64(seed_for(env, opts.seed));

    let users: Vec<User> = (0..opts.count)
        .map(|_| random_user(&mut rng, opts.anchor))
        .collect();

    let cron_jobs = users
        .iter()
        .map(|user| random_cron_job(&mut rng, user, opts.anchor))
        .collect();

    FixtureSet { users, cron_jobs }
}

/// FNV-1a over the environment name, xor'd with the caller's seed.
fn seed_for(env: Environment, seed: u64) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    let hash = env
        .as_ref()
        .bytes()
        .fold(OFFSET, |h, b| (h ^ u64::from(b)).wrapping_mul(PRIME));
    hash ^ seed
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

fn random_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    uuid::Builder::from_random_bytes(rng.random())
        .into_uuid()
        .hyphenated()
        .to_string()
}

fn past_date<R: Rng + ?Sized>(rng: &mut R, anchor: DateTime<Utc>) -> String {
    let age = TimeDelta::seconds(rng.random_range(DAY_SECS..=MAX_AGE_SECS));
    (anchor - age).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn random_user<R: Rng + ?Sized>(rng: &mut R, anchor: DateTime<Utc>) -> User {
    let first_name = pick(rng, words::FIRST_NAMES).to_owned();
    let last_name = pick(rng, words::LAST_NAMES).to_owned();
    let email = format!(
        "{}.{}{}@{}",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        rng.random_range(1..100),
        pick(rng, words::EMAIL_DOMAINS)
    );

    User {
        id: random_id(rng),
        email,
        role: if rng.random_bool(ADMIN_RATIO) {
            Role::Admin
        } else {
            Role::User
        },
        job_title: pick(rng, words::JOB_TITLES).to_owned(),
        created_at: past_date(rng, anchor),
        first_name,
        last_name,
    }
}

fn random_cron_job<R: Rng + ?Sized>(rng: &mut R, owner: &User, anchor: DateTime<Utc>) -> CronJob {
    let name = format!(
        "{} {} {}",
        pick(rng, words::JOB_ADJECTIVES),
        pick(rng, words::JOB_SUBJECTS),
        pick(rng, words::JOB_ACTIONS)
    );

    CronJob {
        id: random_id(rng),
        name,
        user_id: owner.id.clone(),
        status: if rng.random_bool(ACTIVE_RATIO) {
            JobStatus::Active
        } else {
            JobStatus::Inactive
        },
        created_at: past_date(rng, anchor),
        email: owner.email.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn opts(count: usize) -> FixtureOptions {
        FixtureOptions::new(count, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn same_environment_same_records() {
        let a = generate(Environment::Staging, &opts(20));
        let b = generate(Environment::Staging, &opts(20));
        assert_eq!(a.users, b.users);
        assert_eq!(a.cron_jobs, b.cron_jobs);
    }

    #[test]
    fn environments_do_not_share_records() {
        let dev = generate(Environment::Development, &opts(20));
        let prod = generate(Environment::Production, &opts(20));
        let dev_ids: HashSet<_> = dev.users.iter().map(|u| &u.id).collect();
        assert!(prod.users.iter().all(|u| !dev_ids.contains(&u.id)));
    }

    #[test]
    fn seed_changes_output() {
        let mut other = opts(5);
        other.seed = 7;
        let a = generate(Environment::Development, &opts(5));
        let b = generate(Environment::Development, &other);
        assert_ne!(a.users, b.users);
    }

    #[test]
    fn one_job_per_user_with_owner_email() {
        let set = generate(Environment::Development, &opts(50));
        assert_eq!(set.users.len(), 50);
        assert_eq!(set.cron_jobs.len(), 50);
        for (user, job) in set.users.iter().zip(&set.cron_jobs) {
            assert_eq!(job.user_id, user.id);
            assert_eq!(job.email, user.email);
        }
    }

    #[test]
    fn ids_are_unique_uuids() {
        let set = generate(Environment::Production, &opts(200));
        let ids: HashSet<_> = set
            .users
            .iter()
            .map(|u| u.id.as_str())
            .chain(set.cron_jobs.iter().map(|j| j.id.as_str()))
            .collect();
        assert_eq!(ids.len(), 400);
        assert!(ids.iter().all(|id| uuid::Uuid::parse_str(id).is_ok()));
    }

    #[test]
    fn dates_lie_before_anchor() {
        let o = opts(100);
        let set = generate(Environment::Staging, &o);
        for user in &set.users {
            let at = DateTime::parse_from_rfc3339(&user.created_at).unwrap();
            assert!(at < o.anchor);
            assert!(at >= o.anchor - TimeDelta::seconds(MAX_AGE_SECS));
            assert!(user.created_at.ends_with('Z'));
        }
    }

    #[test]
    fn role_and_status_are_skewed() {
        let set = generate(Environment::Development, &opts(1000));
        let admins = set.users.iter().filter(|u| u.role == Role::Admin).count();
        let inactive = set
            .cron_jobs
            .iter()
            .filter(|j| j.status == JobStatus::Inactive)
            .count();
        assert!((40..=180).contains(&admins), "admins = {admins}");
        assert!((40..=180).contains(&inactive), "inactive = {inactive}");
    }
}
