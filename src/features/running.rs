//! Per-user stateful aggregator, fed events in arrival order.

use super::property::PropertyDescription;
use super::FeatureError;
use crate::ingest::EventRecord;

/// Running statistics for one user. Created fresh per user group and updated
/// once per event; readers see the history up to the last `update` call.
#[derive(Debug, Clone, Default)]
pub struct RunningUserFeatures {
    current_access: f64,
    last_access: f64,
    domains: PropertyDescription,
    dest_users: PropertyDescription,
    src_computers: PropertyDescription,
    dest_computers: PropertyDescription,
    failed_logins: u64,
    login_attempts: u64,
}

impl RunningUserFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    fn update_dest_users(&mut self, user: &str) {
        if user != "?" {
            self.dest_users.append(user);
        }
    }

    fn update_src_computers(&mut self, computer: &str) {
        if computer != "?" {
            self.src_computers.append(computer);
        }
    }

    fn update_dest_computers(&mut self, computer: &str) {
        if computer != "?" {
            self.dest_computers.append(computer);
        }
    }

    fn update_domains(&mut self, domain: &str) {
        if domain != "?" {
            self.domains.append(domain);
        }
    }

    /// Fold one event into the running state.
    pub fn update(&mut self, event: &EventRecord) {
        self.update_dest_users(&event.dest_user);
        self.update_src_computers(&event.src_computer);
        self.update_dest_computers(&event.dest_computer);
        self.update_domains(&event.domain);

        self.last_access = self.current_access;
        self.current_access = event.time;
        if !event.is_success() {
            self.failed_logins += 1;
        }
        self.login_attempts += 1;
    }

    pub fn current_access(&self) -> f64 {
        self.current_access
    }

    pub fn last_access(&self) -> f64 {
        self.last_access
    }

    pub fn domains(&self) -> &PropertyDescription {
        &self.domains
    }

    pub fn dest_users(&self) -> &PropertyDescription {
        &self.dest_users
    }

    pub fn src_computers(&self) -> &PropertyDescription {
        &self.src_computers
    }

    pub fn dest_computers(&self) -> &PropertyDescription {
        &self.dest_computers
    }

    pub fn failed_logins(&self) -> u64 {
        self.failed_logins
    }

    pub fn login_attempts(&self) -> u64 {
        self.login_attempts
    }

    /// Gap between the two most recent accesses. On the very first update the
    /// gap is measured from epoch 0 (`last_access` starts at 0) — intentional.
    pub fn time_since_last_access(&self) -> f64 {
        self.current_access - self.last_access
    }

    /// Share of failed logins. Errors if no event has been folded in yet.
    pub fn percentage_failed_logins(&self) -> Result<f64, FeatureError> {
        if self.login_attempts == 0 {
            return Err(FeatureError::NoLoginAttempts);
        }
        Ok(self.failed_logins as f64 / self.login_attempts as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(time: f64, status: &str) -> EventRecord {
        EventRecord {
            time,
            user: "u1".into(),
            domain: "DOM1".into(),
            dest_user: "u2".into(),
            src_computer: "C1".into(),
            dest_computer: "C2".into(),
            auth_type: "Kerberos".into(),
            logon_type: "Network".into(),
            auth_orientation: "LogOn".into(),
            status: status.into(),
        }
    }

    #[test]
    fn first_update_measures_gap_from_epoch() {
        let mut f = RunningUserFeatures::new();
        f.update(&event(1000.0, "Success"));
        assert_eq!(f.time_since_last_access(), 1000.0);
        f.update(&event(1060.0, "Success"));
        assert_eq!(f.time_since_last_access(), 60.0);
    }

    #[test]
    fn failure_percentage_requires_an_attempt() {
        let f = RunningUserFeatures::new();
        assert!(matches!(
            f.percentage_failed_logins(),
            Err(FeatureError::NoLoginAttempts)
        ));
    }

    #[test]
    fn counters_and_trackers_accumulate() {
        let mut f = RunningUserFeatures::new();
        f.update(&event(1.0, "Success"));
        f.update(&event(2.0, "Failure"));
        f.update(&event(3.0, "Failure"));
        assert_eq!(f.login_attempts(), 3);
        assert_eq!(f.failed_logins(), 2);
        assert_eq!(f.percentage_failed_logins().unwrap(), 2.0 / 3.0);
        assert_eq!(f.domains().unique(), 1);
        assert_eq!(f.domains().freq(), 3);
    }

    #[test]
    fn sentinel_values_are_not_tracked() {
        let mut f = RunningUserFeatures::new();
        let mut ev = event(1.0, "Success");
        ev.dest_computer = "?".into();
        f.update(&ev);
        assert_eq!(f.dest_computers().unique(), 0);
        assert_eq!(f.src_computers().unique(), 1);
    }
}
