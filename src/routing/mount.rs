//! Mount table: which router owns which path prefix.
//!
//! # Responsibilities
//! - Hold `(name, prefix, router)` triples in registration order
//! - Reject malformed and duplicate prefixes at build time
//! - Nest every router into one axum `Router`

use axum::Router;

use crate::certificates::CERTIFICATES_PREFIX;
use crate::http::AppContext;
use crate::routing::groups::RouteGroup;
use crate::routing::matcher::MountIndex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MountError {
    #[error("prefix `{0}` must start with `/` and have no trailing `/`")]
    InvalidPrefix(String),

    #[error("prefix `{prefix}` is already mounted by `{existing}`")]
    Duplicate {
        prefix: String,
        existing: &'static str,
    },

    #[error("prefix `{0}` is reserved")]
    Reserved(String),
}

/// One mounted router.
pub struct Mount {
    pub name: &'static str,
    pub prefix: String,
    pub router: Router<AppContext>,
}

/// Ordered, validated set of mounts.
#[derive(Default)]
pub struct MountTable {
    mounts: Vec<Mount>,
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// All seven route groups with their default routers.
    pub fn standard() -> Self {
        let mut table = Self::new();
        for group in RouteGroup::ALL {
            table.mounts.push(Mount {
                name: group.name(),
                prefix: group.prefix().to_string(),
                router: group.default_router(),
            });
        }
        table
    }

    /// Add a router under `prefix`.
    pub fn mount(
        mut self,
        name: &'static str,
        prefix: impl Into<String>,
        router: Router<AppContext>,
    ) -> Result<Self, MountError> {
        let prefix = prefix.into();

        if prefix.len() < 2 || !prefix.starts_with('/') || prefix.ends_with('/') {
            return Err(MountError::InvalidPrefix(prefix));
        }
        if prefix == CERTIFICATES_PREFIX {
            return Err(MountError::Reserved(prefix));
        }
        if let Some(existing) = self.mounts.iter().find(|m| m.prefix == prefix) {
            return Err(MountError::Duplicate {
                prefix,
                existing: existing.name,
            });
        }

        self.mounts.push(Mount { name, prefix, router });
        Ok(self)
    }

    /// Replace the router of a route group, keeping its position.
    /// Mounts the group if it is not present yet.
    pub fn with_group(mut self, group: RouteGroup, router: Router<AppContext>) -> Self {
        match self.mounts.iter_mut().find(|m| m.prefix == group.prefix()) {
            Some(mount) => {
                mount.name = group.name();
                mount.router = router;
            }
            None => self.mounts.push(Mount {
                name: group.name(),
                prefix: group.prefix().to_string(),
                router,
            }),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.mounts.iter().map(|m| m.prefix.as_str())
    }

    /// Name lookup for every mount plus the certificate server.
    pub fn index(&self) -> MountIndex {
        MountIndex::new(
            self.mounts
                .iter()
                .map(|m| (m.prefix.clone(), m.name))
                .chain(std::iter::once((CERTIFICATES_PREFIX.to_string(), "certificates"))),
        )
    }

    /// Nest every mount, in registration order.
    pub fn into_router(self) -> Router<AppContext> {
        self.mounts
            .into_iter()
            .fold(Router::new(), |router, mount| {
                tracing::debug!(name = mount.name, prefix = %mount.prefix, "Mounting route group");
                router.nest(&mount.prefix, mount.router)
            })
    }
}
