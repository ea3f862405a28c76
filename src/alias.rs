//! Deprecated method aliases.
//!
//! SPDK renames RPC methods from time to time (`*_accel_engine` became
//! `*_accel_module`) but keeps the old names working so existing automation
//! does not break. This module holds the registry of retired names and the
//! shim that lets a method run under one while pointing the caller at its
//! replacement.
//!
//! Each legacy name gets its own entry point. The entry point does not have
//! to work out how it was reached; it carries its own [`DeprecationNotice`],
//! hands it to the registry, which emits it, and then runs the shared
//! implementation. [`deprecated_alias!`] generates such entry points for the
//! typed facade and checks at compile time that the legacy name belongs to
//! the method's descriptor. [`crate::dispatch::MethodTable`] generates one
//! route per legacy name for by-name invocation.
//!
//! The registry supplies the policy and the notifier. Its name tables are
//! filled once during start-up through `&mut self` and only read afterwards,
//! so it can be shared across threads without locking.

use std::collections::{HashMap, HashSet};
use std::fmt;

use dashmap::DashSet;

use crate::config::{DeprecationConfig, DeprecationPolicy};
use crate::error::RegistryError;

/// Log target for deprecation notices
pub const DEPRECATION_TARGET: &str = "spdk_rpc::deprecated";

/// One remote operation: its canonical name plus the retired names it still
/// answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub name: &'static str,
    pub legacy: &'static [&'static str],
}

impl MethodDescriptor {
    pub const fn new(name: &'static str) -> Self {
        MethodDescriptor { name, legacy: &[] }
    }

    pub const fn with_legacy(name: &'static str, legacy: &'static [&'static str]) -> Self {
        MethodDescriptor { name, legacy }
    }

    /// True if `name` is the canonical name or one of the legacy names.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.legacy.contains(&name)
    }

    /// True if `name` is one of the legacy names. Usable in const context.
    pub const fn lists_legacy(&self, name: &str) -> bool {
        let mut i = 0;
        while i < self.legacy.len() {
            if const_str_eq(self.legacy[i], name) {
                return true;
            }
            i += 1;
        }
        false
    }

    /// The notice for a call through `legacy`.
    pub const fn notice(&self, legacy: &'static str) -> DeprecationNotice {
        DeprecationNotice {
            legacy,
            canonical: self.name,
        }
    }
}

const fn const_str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Emitted when a method is reached through a legacy name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeprecationNotice {
    pub legacy: &'static str,
    pub canonical: &'static str,
}

impl fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is deprecated, use {} instead.",
            self.legacy, self.canonical
        )
    }
}

/// How a method name was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub descriptor: MethodDescriptor,
    /// The legacy name used, if the lookup went through one
    pub via_legacy: Option<&'static str>,
}

impl Resolution {
    pub fn canonical(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn is_legacy(&self) -> bool {
        self.via_legacy.is_some()
    }
}

type Notifier = Box<dyn Fn(&DeprecationNotice) + Send + Sync>;

/// Legacy name → canonical method mapping.
pub struct AliasRegistry {
    canonical: HashMap<&'static str, MethodDescriptor>,
    legacy: HashMap<&'static str, MethodDescriptor>,
    policy: DeprecationPolicy,
    warned: DashSet<&'static str>,
    notifier: Option<Notifier>,
}

impl AliasRegistry {
    pub fn new(policy: DeprecationPolicy) -> Self {
        AliasRegistry {
            canonical: HashMap::new(),
            legacy: HashMap::new(),
            policy,
            warned: DashSet::new(),
            notifier: None,
        }
    }

    pub fn from_config(config: &DeprecationConfig) -> Self {
        Self::new(config.policy)
    }

    /// Forwards every emitted notice to `notifier` in addition to the log.
    #[must_use]
    pub fn with_notifier<F>(mut self, notifier: F) -> Self
    where
        F: Fn(&DeprecationNotice) + Send + Sync + 'static,
    {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn policy(&self) -> DeprecationPolicy {
        self.policy
    }

    /// Records `descriptor` and all of its legacy names.
    ///
    /// Registering the same descriptor again is a no-op. Nothing is recorded
    /// if any of its names conflicts with an existing entry, or if the
    /// canonical name is already registered with a different legacy list.
    pub fn register(&mut self, descriptor: &MethodDescriptor) -> Result<(), RegistryError> {
        if let Some(existing) = self.canonical.get(descriptor.name) {
            if existing == descriptor {
                return Ok(());
            }
            return Err(RegistryError::LegacyListMismatch {
                canonical: descriptor.name.to_string(),
            });
        }
        if self.legacy.contains_key(descriptor.name) {
            return Err(RegistryError::AliasShadowsCanonical {
                legacy: descriptor.name.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for &legacy in descriptor.legacy {
            if legacy == descriptor.name || self.canonical.contains_key(legacy) {
                return Err(RegistryError::AliasShadowsCanonical {
                    legacy: legacy.to_string(),
                });
            }
            if let Some(existing) = self.legacy.get(legacy) {
                if existing.name != descriptor.name {
                    return Err(RegistryError::AliasConflict {
                        legacy: legacy.to_string(),
                        existing: existing.name.to_string(),
                        requested: descriptor.name.to_string(),
                    });
                }
            }
            seen.insert(legacy);
        }

        self.canonical.insert(descriptor.name, *descriptor);
        for legacy in seen {
            self.legacy.insert(legacy, *descriptor);
        }
        Ok(())
    }

    /// Looks up a canonical or legacy name.
    pub fn resolve(&self, name: &str) -> Option<Resolution> {
        if let Some(descriptor) = self.canonical.get(name) {
            return Some(Resolution {
                descriptor: *descriptor,
                via_legacy: None,
            });
        }
        self.legacy
            .get_key_value(name)
            .map(|(&legacy, descriptor)| Resolution {
                descriptor: *descriptor,
                via_legacy: Some(legacy),
            })
    }

    /// Canonical name a legacy name stands for.
    pub fn canonical_for(&self, legacy: &str) -> Option<&'static str> {
        self.legacy.get(legacy).map(|d| d.name)
    }

    pub fn is_legacy(&self, name: &str) -> bool {
        self.legacy.contains_key(name)
    }

    /// All registered legacy names, sorted.
    pub fn legacy_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.legacy.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Signals that a call arrived through the registered name `legacy` and
    /// emits the notice the policy calls for.
    ///
    /// Returns the notice if one was emitted. Never fails: an unknown name is
    /// logged at debug level and otherwise ignored. Entry points that know
    /// their own notice use [`AliasRegistry::notify`] instead.
    pub fn deprecated_call(&self, legacy: &str) -> Option<DeprecationNotice> {
        let Some((&legacy, descriptor)) = self.legacy.get_key_value(legacy) else {
            tracing::debug!(name = legacy, "deprecated call through unregistered name");
            return None;
        };
        self.notify(descriptor.notice(legacy))
    }

    /// Emits `notice` as the policy calls for, whether or not its names were
    /// registered.
    ///
    /// Returns the notice if one was emitted.
    pub fn notify(&self, notice: DeprecationNotice) -> Option<DeprecationNotice> {
        if self.policy == DeprecationPolicy::Once && !self.warned.insert(notice.legacy) {
            return None;
        }

        tracing::warn!(
            target: DEPRECATION_TARGET,
            legacy = notice.legacy,
            canonical = notice.canonical,
            "{notice}"
        );
        if let Some(notifier) = &self.notifier {
            notifier(&notice);
        }
        Some(notice)
    }

    /// Runs `f` as a call made through `notice.legacy`.
    ///
    /// The notice goes out before `f` runs; whatever `f` returns is passed
    /// back untouched.
    pub fn invoke_legacy<R>(&self, notice: DeprecationNotice, f: impl FnOnce() -> R) -> R {
        self.notify(notice);
        f()
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

impl Default for AliasRegistry {
    fn default() -> Self {
        Self::new(DeprecationPolicy::default())
    }
}

impl fmt::Debug for AliasRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliasRegistry")
            .field("methods", &self.canonical.len())
            .field("legacy", &self.legacy_names())
            .field("policy", &self.policy)
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}

/// Generates a typed entry point for a legacy method name.
///
/// ```text
/// deprecated_alias!(IAA_SCAN_ACCEL_MODULE, iaa_scan_accel_engine => iaa_scan_accel_module());
/// ```
///
/// expands to `pub fn iaa_scan_accel_engine(registry, client)` which emits
/// the notice for `iaa_scan_accel_engine` under `registry`'s policy and then
/// calls `iaa_scan_accel_module(client)`. The build fails if the descriptor
/// does not list the legacy name.
macro_rules! deprecated_alias {
    ($descriptor:ident, $legacy:ident => $canonical:ident($($arg:ident: $ty:ty),* $(,)?)) => {
        const _: () = assert!(
            $descriptor.lists_legacy(stringify!($legacy)),
            concat!(stringify!($legacy), " is not a legacy name of ", stringify!($descriptor))
        );

        #[doc = concat!("Deprecated name for [`", stringify!($canonical), "`].")]
        ///
        /// Emits a deprecation notice through `registry`, then behaves exactly
        /// like the canonical function.
        pub fn $legacy<C: $crate::client::RpcClient + ?Sized>(
            registry: &$crate::alias::AliasRegistry,
            client: &C,
            $($arg: $ty),*
        ) -> $crate::error::RpcResult<::serde_json::Value> {
            registry.invoke_legacy($descriptor.notice(stringify!($legacy)), || {
                $canonical(client $(, $arg)*)
            })
        }
    };
}

pub(crate) use deprecated_alias;
