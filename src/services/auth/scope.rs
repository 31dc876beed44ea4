//! Scope-based authorization.
//!
//! Policy: an empty requirement only needs authentication. Otherwise ANY one
//! of the required scopes is enough (union match, not intersection), and the
//! `admin` scope passes every check.
use std::sync::Arc;

use super::error::{AuthError, Result};

pub const ADMIN_SCOPE: &str = "admin";

/// Scopes acceptable for one protected route. Fixed when the route is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredScopes(Arc<[String]>);

impl RequiredScopes {
    /// Authentication only, no specific permission.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn any_of<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(scopes.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn is_authorized<S: AsRef<str>>(granted: &[S], required: &[S]) -> bool {
    if required.is_empty() {
        return true;
    }

    granted.iter().any(|g| {
        let g = g.as_ref();
        g == ADMIN_SCOPE || required.iter().any(|r| r.as_ref() == g)
    })
}

pub fn authorize(granted: &[String], required: &RequiredScopes) -> Result<()> {
    if is_authorized(granted, required.as_slice()) {
        Ok(())
    } else {
        Err(AuthError::InsufficientScope)
    }
}
