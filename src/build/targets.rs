//! Target platform selection
//!
//! The toolchain image builds for a closed set of seven platform/arch pairs.
//! A target spec is either the sentinel `all` or a comma separated list of
//! target tokens; tokens are matched verbatim and unknown ones are ignored.

use std::fmt;

use crate::utils::terminal::{print_info, print_warning};

/// Sentinel spec selecting every target
pub const ALL_TARGETS: &str = "all";

/// Supported cross compilation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// linux/amd64
    Linux64,
    /// linux/386
    Linux386,
    /// linux/arm
    LinuxArm,
    /// windows/amd64
    Windows64,
    /// windows/386
    Windows386,
    /// darwin/amd64
    Darwin64,
    /// darwin/386
    Darwin386,
}

impl Target {
    /// Every target, in container environment order
    pub const ALL: [Target; 7] = [
        Target::Linux64,
        Target::Linux386,
        Target::LinuxArm,
        Target::Windows64,
        Target::Windows386,
        Target::Darwin64,
        Target::Darwin386,
    ];

    /// Token accepted in the target spec
    pub fn token(self) -> &'static str {
        match self {
            Target::Linux64 => "linux64",
            Target::Linux386 => "linux386",
            Target::LinuxArm => "linuxArm",
            Target::Windows64 => "windows64",
            Target::Windows386 => "windows386",
            Target::Darwin64 => "darwin64",
            Target::Darwin386 => "darwin386",
        }
    }

    /// Environment variable the toolchain image reads for this target
    pub fn env_var(self) -> &'static str {
        match self {
            Target::Linux64 => "LINUX64",
            Target::Linux386 => "LINUX386",
            Target::LinuxArm => "LINUXARM",
            Target::Windows64 => "WINDOWS64",
            Target::Windows386 => "WINDOWS386",
            Target::Darwin64 => "DARWIN64",
            Target::Darwin386 => "DARWIN386",
        }
    }

    /// Go `GOOS/GOARCH` pair
    pub fn platform(self) -> &'static str {
        match self {
            Target::Linux64 => "linux/amd64",
            Target::Linux386 => "linux/386",
            Target::LinuxArm => "linux/arm",
            Target::Windows64 => "windows/amd64",
            Target::Windows386 => "windows/386",
            Target::Darwin64 => "darwin/amd64",
            Target::Darwin386 => "darwin/386",
        }
    }

    /// Exact, case-sensitive token lookup
    pub fn from_token(token: &str) -> Option<Target> {
        Target::ALL.into_iter().find(|t| t.token() == token)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One boolean per supported target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetSet {
    pub linux64: bool,
    pub linux386: bool,
    pub linux_arm: bool,
    pub windows64: bool,
    pub windows386: bool,
    pub darwin64: bool,
    pub darwin386: bool,
}

impl TargetSet {
    /// Every target enabled
    pub fn all() -> Self {
        let mut set = Self::default();
        for target in Target::ALL {
            set.insert(target);
        }
        set
    }

    /// Derive the set from a target spec string
    pub fn from_spec(spec: &str) -> Self {
        if spec == ALL_TARGETS {
            return Self::all();
        }
        let mut set = Self::default();
        for target in spec.split(',').filter_map(Target::from_token) {
            set.insert(target);
        }
        set
    }

    pub fn insert(&mut self, target: Target) {
        *self.flag_mut(target) = true;
    }

    pub fn contains(&self, target: Target) -> bool {
        match target {
            Target::Linux64 => self.linux64,
            Target::Linux386 => self.linux386,
            Target::LinuxArm => self.linux_arm,
            Target::Windows64 => self.windows64,
            Target::Windows386 => self.windows386,
            Target::Darwin64 => self.darwin64,
            Target::Darwin386 => self.darwin386,
        }
    }

    pub fn is_empty(&self) -> bool {
        Target::ALL.iter().all(|t| !self.contains(*t))
    }

    /// Enabled targets in canonical order
    pub fn enabled(&self) -> Vec<Target> {
        Target::ALL
            .into_iter()
            .filter(|t| self.contains(*t))
            .collect()
    }

    /// `NAME=true|false` pairs for every target, in canonical order
    pub fn env_pairs(&self) -> Vec<(&'static str, bool)> {
        Target::ALL
            .into_iter()
            .map(|t| (t.env_var(), self.contains(t)))
            .collect()
    }

    fn flag_mut(&mut self, target: Target) -> &mut bool {
        match target {
            Target::Linux64 => &mut self.linux64,
            Target::Linux386 => &mut self.linux386,
            Target::LinuxArm => &mut self.linux_arm,
            Target::Windows64 => &mut self.windows64,
            Target::Windows386 => &mut self.windows386,
            Target::Darwin64 => &mut self.darwin64,
            Target::Darwin386 => &mut self.darwin386,
        }
    }
}

/// Tokens in the spec that name no known target
pub fn unrecognized_tokens(spec: &str) -> Vec<&str> {
    if spec == ALL_TARGETS {
        return Vec::new();
    }
    spec.split(',')
        .filter(|token| !token.is_empty() && Target::from_token(token).is_none())
        .collect()
}

/// Derive the target set and report selection problems on stderr.
///
/// Warnings never change the result: unknown tokens are still dropped and an
/// empty selection still goes to the container as an all-false build.
pub fn select(spec: &str) -> TargetSet {
    let set = TargetSet::from_spec(spec);

    for token in unrecognized_tokens(spec) {
        print_warning(&format!(
            "ignoring unknown target '{}' (expected one of: {})",
            token,
            Target::ALL.map(Target::token).join(", ")
        ));
    }

    if spec == ALL_TARGETS {
        print_info("Building for all arch");
    } else if set.is_empty() {
        print_warning(&format!("no known targets selected by '{}', nothing will be built", spec));
    } else {
        let platforms: Vec<_> = set.enabled().into_iter().map(Target::platform).collect();
        print_info(&format!("Building for {}", platforms.join(", ")));
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_enables_everything() {
        let set = TargetSet::from_spec("all");
        assert_eq!(set, TargetSet::all());
        for target in Target::ALL {
            assert!(set.contains(target), "{} should be enabled", target);
        }
    }

    #[test]
    fn test_linux64_darwin64() {
        let set = TargetSet::from_spec("linux64,darwin64");
        assert_eq!(
            set,
            TargetSet {
                linux64: true,
                linux386: false,
                linux_arm: false,
                windows64: false,
                windows386: false,
                darwin64: true,
                darwin386: false,
            }
        );
    }

    #[test]
    fn test_order_and_duplicates_do_not_matter() {
        let a = TargetSet::from_spec("windows386,linuxArm,windows386");
        let b = TargetSet::from_spec("linuxArm,windows386");
        assert_eq!(a, b);
        assert_eq!(a.enabled(), vec![Target::LinuxArm, Target::Windows386]);
    }

    #[test]
    fn test_each_token_selects_only_itself() {
        for target in Target::ALL {
            let set = TargetSet::from_spec(target.token());
            assert_eq!(set.enabled(), vec![target]);
        }
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let set = TargetSet::from_spec("linux-amd64,freebsd64,ALL");
        assert!(set.is_empty());
        assert_eq!(
            unrecognized_tokens("linux-amd64,freebsd64,ALL"),
            vec!["linux-amd64", "freebsd64", "ALL"]
        );
    }

    #[test]
    fn test_tokens_are_matched_verbatim() {
        assert!(TargetSet::from_spec("LINUX64").is_empty());
        assert!(TargetSet::from_spec(" linux64").is_empty());
        assert!(TargetSet::from_spec("linuxarm").is_empty());
        assert!(TargetSet::from_spec("all,linux64").linux64);
        assert!(!TargetSet::from_spec("all,linux64").darwin64);
    }

    #[test]
    fn test_empty_spec_selects_nothing() {
        assert!(TargetSet::from_spec("").is_empty());
        assert!(unrecognized_tokens("").is_empty());
        assert!(unrecognized_tokens("all").is_empty());
    }

    #[test]
    fn test_select_matches_from_spec() {
        for spec in ["all", "", "linux64,bogus", "darwin386,darwin386"] {
            assert_eq!(select(spec), TargetSet::from_spec(spec));
        }
    }

    #[test]
    fn test_env_pairs_order() {
        let names: Vec<_> = TargetSet::default()
            .env_pairs()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec!["LINUX64", "LINUX386", "LINUXARM", "WINDOWS64", "WINDOWS386", "DARWIN64", "DARWIN386"]
        );
    }
}
