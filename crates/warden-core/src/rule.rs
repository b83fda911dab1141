// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Warden Contributors. All rights reserved.

//! Rule model: raw persisted rows and the typed rules decoded from them.
//!
//! Rows are persisted in a fixed 7-column shape `(id, ptype, v0..v5)` where
//! `ptype` is `"p"` for policy rules and `"g"` for role-assignment rules.
//! Decoding happens once, at load or append time; evaluation only ever sees
//! the typed form.

use serde::{Deserialize, Serialize};

// =============================================================================
// RawRule
// =============================================================================

/// A raw persisted rule row.
///
/// `v0..v2` carry `(role, resource, action)` for policy rules or
/// `(subject, role)` for role-assignment rules; trailing columns are unused
/// by the current model but preserved for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRule {
    /// Row id, assigned by the store in insertion order.
    pub id: u64,
    /// Rule type: `"p"` (policy) or `"g"` (role assignment).
    pub ptype: String,
    /// First value column.
    #[serde(default)]
    pub v0: String,
    /// Second value column.
    #[serde(default)]
    pub v1: String,
    /// Third value column.
    #[serde(default)]
    pub v2: String,
    /// Optional fourth value column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v3: Option<String>,
    /// Optional fifth value column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v4: Option<String>,
    /// Optional sixth value column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v5: Option<String>,
}

impl RawRule {
    /// Creates a policy row. The action is case-normalized on write.
    pub fn policy(
        id: u64,
        role: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            id,
            ptype: "p".to_string(),
            v0: role.into(),
            v1: resource.into(),
            v2: action.into().to_lowercase(),
            v3: None,
            v4: None,
            v5: None,
        }
    }

    /// Creates a role-assignment row.
    pub fn assignment(id: u64, subject: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id,
            ptype: "g".to_string(),
            v0: subject.into(),
            v1: role.into(),
            v2: String::new(),
            v3: None,
            v4: None,
            v5: None,
        }
    }

    /// Decodes this row into a typed rule, if it carries one.
    ///
    /// Rows with an unknown `ptype` or with empty required fields decode to
    /// `None`: they are preserved for listing but never match a request
    /// (absent data must not become a wildcard).
    pub fn decode(&self) -> Option<Rule> {
        match self.ptype.as_str() {
            "p" => {
                if self.v0.is_empty() || self.v1.is_empty() || self.v2.is_empty() {
                    return None;
                }
                Some(Rule::Policy(PolicyRule {
                    role: self.v0.clone(),
                    resource: self.v1.clone(),
                    action: self.v2.to_lowercase(),
                }))
            }
            "g" => {
                if self.v0.is_empty() || self.v1.is_empty() {
                    return None;
                }
                Some(Rule::Assignment(RoleAssignment {
                    subject: self.v0.clone(),
                    role: self.v1.clone(),
                }))
            }
            _ => None,
        }
    }
}

// =============================================================================
// Typed Rules
// =============================================================================

/// An allow-rule: the given role may perform the action on the resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Role the rule grants to.
    pub role: String,
    /// Resource pattern matched against the request target.
    pub resource: String,
    /// Action verb, stored lower-cased.
    pub action: String,
}

/// A grant-rule: the subject holds the role.
///
/// When `subject` is itself a role name this expresses role inheritance;
/// assignment and inheritance share one relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Subject (a user id or an inheriting role name).
    pub subject: String,
    /// Granted role.
    pub role: String,
}

/// A decoded rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Policy (allow) rule.
    Policy(PolicyRule),
    /// Role assignment / inheritance rule.
    Assignment(RoleAssignment),
}

// =============================================================================
// RuleSet
// =============================================================================

/// An immutable, decoded view of the rule set.
///
/// A `RuleSet` is built once per mutation and shared behind an `Arc`; an
/// evaluation always runs against exactly one `RuleSet`, so concurrent adds
/// can never be observed half-applied.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    raw: Vec<RawRule>,
    policies: Vec<PolicyRule>,
    assignments: Vec<RoleAssignment>,
}

impl RuleSet {
    /// Builds a rule set from raw rows, decoding each once.
    pub fn from_raw(rows: Vec<RawRule>) -> Self {
        let mut set = Self {
            raw: Vec::with_capacity(rows.len()),
            policies: Vec::new(),
            assignments: Vec::new(),
        };
        for row in rows {
            set.push(row);
        }
        set
    }

    /// Appends a row, keeping the decoded indexes in sync.
    pub fn push(&mut self, row: RawRule) {
        match row.decode() {
            Some(Rule::Policy(p)) => self.policies.push(p),
            Some(Rule::Assignment(g)) => self.assignments.push(g),
            None => {}
        }
        self.raw.push(row);
    }

    /// Raw rows in insertion order.
    pub fn raw(&self) -> &[RawRule] {
        &self.raw
    }

    /// Decoded policy rules.
    pub fn policies(&self) -> &[PolicyRule] {
        &self.policies
    }

    /// Decoded role-assignment rules.
    pub fn assignments(&self) -> &[RoleAssignment] {
        &self.assignments
    }

    /// Number of raw rows.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set holds no rows.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Highest assigned row id, or 0 for an empty set.
    pub fn max_id(&self) -> u64 {
        self.raw.iter().map(|r| r.id).max().unwrap_or(0)
    }

    /// A page of raw rows in insertion order.
    ///
    /// An out-of-range offset yields an empty page, never an error.
    pub fn page(&self, offset: usize, limit: usize) -> Vec<RawRule> {
        self.raw.iter().skip(offset).take(limit).cloned().collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
