//! Search configuration

use crate::models::EntityType;
use crate::search::grouping::HARD_GROUP_LIMIT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

/// Per-group caps for the compact results view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLimits {
    /// Caps keyed by entity type
    #[serde(default)]
    pub per_entity_type: BTreeMap<EntityType, usize>,

    /// Cap for types without their own entry
    #[serde(default)]
    pub default_limit: Option<usize>,
}

impl GroupLimits {
    pub fn with_limit(mut self, entity_type: EntityType, limit: usize) -> Self {
        self.per_entity_type.insert(entity_type, limit);
        self
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = Some(limit);
        self
    }

    /// Per-type cap, then the default cap, then [`HARD_GROUP_LIMIT`]
    pub fn limit_for(&self, entity_type: EntityType) -> usize {
        self.per_entity_type
            .get(&entity_type)
            .copied()
            .or(self.default_limit)
            .unwrap_or(HARD_GROUP_LIMIT)
    }
}

impl Default for GroupLimits {
    fn default() -> Self {
        Self {
            per_entity_type: BTreeMap::new(),
            default_limit: Some(3),
        }
    }
}

/// Search service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SearchConfig {
    /// Simulated response latency in milliseconds
    #[validate(range(max = 10_000))]
    pub delay_ms: u64,

    /// Latency for queries at or below `short_query_chars`
    #[validate(range(max = 10_000))]
    pub short_query_delay_ms: u64,

    /// Trimmed length at which a query counts as short
    #[validate(range(max = 64))]
    pub short_query_chars: usize,

    pub group_limits: GroupLimits,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            delay_ms: 250,
            short_query_delay_ms: 50,
            short_query_chars: 2,
            group_limits: GroupLimits::default(),
        }
    }
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    /// Field ranges plus group limits
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        self.group_limits.validate()
    }

    /// Latency applied to a query; short queries respond faster
    pub fn delay_for(&self, query: &str) -> u64 {
        if query.trim().chars().count() <= self.short_query_chars {
            self.short_query_delay_ms.min(self.delay_ms)
        } else {
            self.delay_ms
        }
    }
}

impl Validate for GroupLimits {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let too_large = self
            .per_entity_type
            .values()
            .copied()
            .chain(self.default_limit)
            .any(|limit| limit > MAX_GROUP_LIMIT);

        let mut errors = ValidationErrors::new();
        if too_large {
            errors.add("group_limits", ValidationError::new("group_limit_too_large"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

const MAX_GROUP_LIMIT: usize = 1_000;

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.delay_ms = delay_ms;
        self
    }

    pub fn short_query_delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.short_query_delay_ms = delay_ms;
        self
    }

    pub fn short_query_chars(mut self, chars: usize) -> Self {
        self.config.short_query_chars = chars;
        self
    }

    pub fn group_limits(mut self, limits: GroupLimits) -> Self {
        self.config.group_limits = limits;
        self
    }

    pub fn group_limit(mut self, entity_type: EntityType, limit: usize) -> Self {
        self.config.group_limits.per_entity_type.insert(entity_type, limit);
        self
    }

    pub fn default_group_limit(mut self, limit: usize) -> Self {
        self.config.group_limits.default_limit = Some(limit);
        self
    }

    /// Disable simulated latency entirely
    pub fn no_delay(self) -> Self {
        self.delay_ms(0).short_query_delay_ms(0)
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
