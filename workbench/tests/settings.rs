//! Settings layering and the dropped-override policy.

mod common;

use anyhow::Result;
use rstest::rstest;
use workbench::{Builders, Defaults, DroppedOverridePolicy, Settings, WorkbenchError};
use workbench_test_helpers::figment::{load_settings, with_jail, write_settings};
use workbench_test_helpers::logs::capture_warnings;

#[rstest]
fn missing_file_uses_defaults() -> Result<()> {
    let settings = with_jail(|_| load_settings())?;
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.dropped_override, DroppedOverridePolicy::Ignore);
    Ok(())
}

#[rstest]
#[case::file_only(Some("warn"), None, DroppedOverridePolicy::Warn)]
#[case::env_only(None, Some("warn"), DroppedOverridePolicy::Warn)]
#[case::env_beats_file(Some("warn"), Some("ignore"), DroppedOverridePolicy::Ignore)]
fn environment_overrides_the_file(
    #[case] file: Option<&str>,
    #[case] env: Option<&str>,
    #[case] expected: DroppedOverridePolicy,
) -> Result<()> {
    let settings = with_jail(|jail| {
        if let Some(policy) = file {
            write_settings(jail, &format!("dropped_override = \"{policy}\""))?;
        }
        if let Some(policy) = env {
            jail.set_env("WORKBENCH_DROPPED_OVERRIDE", policy);
        }
        load_settings()
    })?;
    assert_eq!(settings.dropped_override, expected);
    Ok(())
}

#[rstest]
fn unknown_policy_is_a_settings_error() -> Result<()> {
    let err = with_jail(|jail| {
        write_settings(jail, "dropped_override = \"explode\"")?;
        Ok(Settings::load().expect_err("explode is not a policy"))
    })?;
    assert!(matches!(err, WorkbenchError::Settings(_)));
    Ok(())
}

fn context(policy: DroppedOverridePolicy) -> Result<Builders> {
    Ok(Builders::new(common::registry()?).with_settings(Settings {
        dropped_override: policy,
    }))
}

#[rstest]
#[case::ignore(DroppedOverridePolicy::Ignore, false)]
#[case::warn(DroppedOverridePolicy::Warn, true)]
fn discarding_pending_overrides_follows_the_policy(
    #[case] policy: DroppedOverridePolicy,
    #[case] warns: bool,
) -> Result<()> {
    let builders = context(policy)?;
    let (discarded, logs) = capture_warnings(|| {
        builders.use_class("admin/user").count_with("user");
        builders.discard_pending()
    });
    assert!(discarded);
    assert!(builders.pending().is_empty());
    assert_eq!(logs.contains("dropping overrides"), warns, "logs: {logs}");
    assert_eq!(logs.contains("admin/user"), warns, "logs: {logs}");

    let (again, quiet) = capture_warnings(|| builders.discard_pending());
    assert!(!again);
    assert!(quiet.is_empty(), "nothing left to drop: {quiet}");
    Ok(())
}

#[rstest]
#[case::ignore(DroppedOverridePolicy::Ignore, false)]
#[case::warn(DroppedOverridePolicy::Warn, true)]
fn dropping_a_context_with_pending_overrides_follows_the_policy(
    #[case] policy: DroppedOverridePolicy,
    #[case] warns: bool,
) -> Result<()> {
    let builders = context(policy)?;
    let ((), logs) = capture_warnings(move || {
        builders.count_with("ghost");
        drop(builders);
    });
    assert_eq!(logs.contains("dropping overrides"), warns, "logs: {logs}");
    assert_eq!(logs.contains("ghost"), warns, "logs: {logs}");
    Ok(())
}

#[rstest]
fn consumed_overrides_are_not_reported_on_drop() -> Result<()> {
    let builders = context(DroppedOverridePolicy::Warn)?;
    builders.use_class("admin/user");
    builders.define("boss", Defaults::object(|_: &mut common::admin::User| {}))?;
    let ((), logs) = capture_warnings(move || drop(builders));
    assert!(logs.is_empty(), "unexpected warnings: {logs}");
    Ok(())
}

#[rstest]
fn replacing_a_pending_override_warns_regardless_of_policy() -> Result<()> {
    let builders = context(DroppedOverridePolicy::Ignore)?;
    let ((), logs) = capture_warnings(|| {
        builders.use_class("user").use_class("admin/user");
    });
    assert!(logs.contains("replaced an unconsumed use_class override"), "logs: {logs}");
    Ok(())
}
