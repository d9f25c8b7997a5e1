//! Property-based tests for template resolution, device resolution and
//! package validation.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use apkdeploy_cli::application::ports::StreamOutput;
use apkdeploy_cli::application::services::log_supervisor::LogSupervisor;
use apkdeploy_cli::domain::commands::{self, PLACEHOLDER};
use apkdeploy_cli::domain::config::SupervisorConfig;
use apkdeploy_cli::domain::{
    DeployError, DeviceDescriptor, DeviceState, PackageName, resolve_device,
};
use proptest::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::mocks::{InstantSleeper, Liveness, RecordingBridge};

fn package_name() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9_]{0,8}", 2..5).prop_map(|parts| parts.join("."))
}

// ============================================================================
// Template resolution
// ============================================================================

proptest! {
    /// No resolved template still contains the placeholder, and every
    /// template that referenced it now names the package.
    #[test]
    fn prop_resolution_consumes_placeholder(name in package_name()) {
        let package = PackageName::parse(&name).expect("generated names are valid");
        for template in commands::ALL {
            let resolved = template.resolve(&package);
            prop_assert!(!resolved.contains(PLACEHOLDER), "left placeholder in: {resolved}");
            if template.raw().contains(PLACEHOLDER) {
                prop_assert!(resolved.contains(&name));
            }
        }
    }

    /// Resolving twice yields the same text.
    #[test]
    fn prop_resolution_is_deterministic(name in package_name()) {
        let package = PackageName::parse(&name).expect("generated names are valid");
        for template in commands::ALL {
            prop_assert_eq!(template.resolve(&package), template.resolve(&package));
        }
    }

    /// Names carrying shell metacharacters never reach a template.
    #[test]
    fn prop_metacharacter_names_rejected(
        name in package_name(),
        meta in prop::sample::select(vec![";", "|", "&", "$", "`", "'", "\"", " ", "{", "}", "\n"]),
        at in 0usize..32,
    ) {
        let at = at.min(name.len());
        let tainted = format!("{}{meta}{}", &name[..at], &name[at..]);
        prop_assert!(matches!(
            PackageName::parse(&tainted),
            Err(DeployError::InvalidPackage(_))
        ));
    }
}

// ============================================================================
// Device resolution
// ============================================================================

fn descriptor() -> impl Strategy<Value = DeviceDescriptor> {
    (
        prop::sample::select(vec!["a", "b", "c"]),
        prop::sample::select(vec![
            DeviceState::Device,
            DeviceState::Offline,
            DeviceState::Unauthorized,
        ]),
    )
        .prop_map(|(serial, state)| DeviceDescriptor {
            serial: serial.to_string(),
            state,
        })
}

proptest! {
    /// A handle is produced exactly when one connected entry matches.
    #[test]
    fn prop_resolution_requires_exactly_one_match(
        devices in prop::collection::vec(descriptor(), 0..6),
        wanted in prop::sample::select(vec!["a", "b", "c"]),
    ) {
        let matches = devices
            .iter()
            .filter(|d| d.serial == wanted && d.state == DeviceState::Device)
            .count();
        match resolve_device(&devices, wanted) {
            Ok(handle) => {
                prop_assert_eq!(matches, 1);
                prop_assert_eq!(handle.serial(), wanted);
            }
            Err(DeployError::DeviceNotFound { device }) => {
                prop_assert_ne!(matches, 1);
                prop_assert_eq!(device, wanted);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }
}

// ============================================================================
// Liveness polling
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// With the app alive for `n` checks, exactly `n + 1` checks run.
    #[test]
    fn prop_poll_count_is_alive_checks_plus_one(n in 0usize..20) {
        let bridge = RecordingBridge::with_devices(&["dev"])
            .with_liveness(&vec![Liveness::Alive; n]);
        let sleeper = InstantSleeper::default();
        let handle = resolve_device(&[DeviceDescriptor::online("dev")], "dev").unwrap();
        let package = PackageName::parse("com.example.app").unwrap();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        runtime
            .block_on(
                LogSupervisor::new(
                    &bridge,
                    &sleeper,
                    SupervisorConfig::default(),
                    CancellationToken::new(),
                )
                .run(&handle, &package, StreamOutput::Discard),
            )
            .expect("supervision ends when the app exits");

        prop_assert_eq!(bridge.pid_checks(), n + 1);
        prop_assert_eq!(sleeper.durations().len(), n + 1);
        prop_assert!(bridge.stream_killed());
    }
}
