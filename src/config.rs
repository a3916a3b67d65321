//! Session settings, read from the environment.

use std::env;

/// Keep fixture roots on disk after the session ends when set to a truthy value.
pub const KEEP_ENV_VAR: &str = "INLINE_FIXTURES_KEEP";
/// Overrides the temporary directory name prefix.
pub const PREFIX_ENV_VAR: &str = "INLINE_FIXTURES_PREFIX";

pub const DEFAULT_PREFIX: &str = "inline_fixture_";

#[derive(Clone, Debug, Eq, PartialEq, derive_new::new)]
pub struct FixtureSettings {
	/// Leave the fixture root in place instead of removing it.
	pub keep: bool,
	#[new(value = "DEFAULT_PREFIX.to_owned()")]
	pub prefix: String,
}

impl Default for FixtureSettings {
	fn default() -> Self {
		Self::new(false)
	}
}

impl FixtureSettings {
	pub fn from_env() -> Self {
		let keep = env::var(KEEP_ENV_VAR).is_ok_and(|value| flag_is_set(&value));
		let prefix = env::var(PREFIX_ENV_VAR).ok().filter(|prefix| !prefix.is_empty()).unwrap_or_else(|| DEFAULT_PREFIX.to_owned());
		Self { keep, prefix }
	}

	pub fn keep(mut self, keep: bool) -> Self {
		self.keep = keep;
		self
	}

	pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}
}

/// Empty, `0`, `false`, `no` and `off` are unset; anything else is set.
pub fn flag_is_set(value: &str) -> bool {
	let value = value.trim();
	!(value.is_empty() || ["0", "false", "no", "off"].iter().any(|off| value.eq_ignore_ascii_case(off)))
}

#[cfg(test)]
mod tests {
	use serial_test::serial;

	use super::*;

	#[test]
	fn test_flag_values() {
		for on in ["1", "true", "yes", "TRUE", "keep"] {
			assert!(flag_is_set(on), "{on:?}");
		}
		for off in ["", " ", "0", "false", "No", "OFF"] {
			assert!(!flag_is_set(off), "{off:?}");
		}
	}

	#[test]
	fn test_defaults() {
		let settings = FixtureSettings::default();
		assert!(!settings.keep);
		assert_eq!(settings.prefix, DEFAULT_PREFIX);
		assert_eq!(FixtureSettings::new(true).prefix("custom_"), FixtureSettings { keep: true, prefix: "custom_".to_owned() });
	}

	#[test]
	#[serial]
	fn test_from_env() {
		// SAFETY: no other test writes the environment concurrently (`#[serial]`); concurrent readers
		// such as `tempfile` looking up `TMPDIR` go through std's internal environment lock.
		unsafe {
			env::set_var(KEEP_ENV_VAR, "1");
			env::set_var(PREFIX_ENV_VAR, "from_env_");
		}
		let settings = FixtureSettings::from_env();
		// SAFETY: as above.
		unsafe {
			env::remove_var(KEEP_ENV_VAR);
			env::remove_var(PREFIX_ENV_VAR);
		}

		assert!(settings.keep);
		assert_eq!(settings.prefix, "from_env_");
		assert_eq!(FixtureSettings::from_env(), FixtureSettings::default());
	}
}
