// Process identity shown on the upload page

use nix::unistd::{getegid, geteuid, User};

/// User name and numeric ids the process runs as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeIdentity {
    pub user: String,
    pub uid: u32,
    pub gid: u32,
}

impl RuntimeIdentity {
    /// Capture the identity of the current process.
    ///
    /// The name comes from `USER` when set, otherwise from the passwd entry
    /// of the effective uid. Lambda access points often run as a uid with no
    /// passwd entry, which yields "unknown".
    pub fn current() -> Self {
        let uid = geteuid();
        let gid = getegid();
        let user = std::env::var("USER")
            .ok()
            .filter(|u| !u.is_empty())
            .or_else(|| User::from_uid(uid).ok().flatten().map(|u| u.name))
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            user,
            uid: uid.as_raw(),
            gid: gid.as_raw(),
        }
    }
}
