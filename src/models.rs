//! The public-to-upstream model mapping table.
//!
//! Clients ask for familiar OpenAI/Anthropic/Google model names; the table
//! decides which NIM model actually serves them. Unknown names are not an
//! error: they are routed to [`DEFAULT_UPSTREAM_MODEL`].

use tracing::info;

/// Upstream model used when a requested model has no entry in the table.
pub const DEFAULT_UPSTREAM_MODEL: &str = "deepseek-ai/deepseek-v3.1";

/// `owned_by` value reported for every listed model.
pub const MODEL_OWNER: &str = "nvidia-nim-proxy";

const MODEL_MAPPING: &[(&str, &str)] = &[
    ("gpt-3.5-turbo", "nvidia/llama-3.1-nemotron-ultra-253b-v1"),
    ("gpt-4", "qwen/qwen3-coder-480b-a35b-instruct"),
    ("gpt-4-turbo", "moonshotai/kimi-k2-instruct-0905"),
    ("gpt-4o", "deepseek-ai/deepseek-v3.1"),
    ("claude-3-opus", "openai/gpt-oss-120b"),
    ("claude-3-sonnet", "openai/gpt-oss-20b"),
    ("gemini-pro", "qwen/qwen3-next-80b-a3b-thinking"),
    ("deepseek-v3.2", "deepseek-ai/deepseek-v3.2"),
    ("kimi-k2-thinking", "moonshotai/kimi-k2-thinking"),
    ("deepseek-v3.1-terminus", "deepseek-ai/deepseek-v3.1-terminus"),
    ("glm4.7", "z-ai/glm4.7"),
];

/// Ordered, immutable mapping from public model ids to upstream model ids.
#[derive(Debug, Clone, Copy)]
pub struct ModelTable {
    entries: &'static [(&'static str, &'static str)],
    fallback: &'static str,
}

impl Default for ModelTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModelTable {
    /// The table shipped with the proxy.
    #[must_use]
    pub const fn builtin() -> Self {
        Self::new(MODEL_MAPPING, DEFAULT_UPSTREAM_MODEL)
    }

    /// Build a table from a static entry list. Keys must be unique.
    #[must_use]
    pub const fn new(
        entries: &'static [(&'static str, &'static str)],
        fallback: &'static str,
    ) -> Self {
        Self { entries, fallback }
    }

    #[must_use]
    pub fn lookup(&self, public_id: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(public, _)| *public == public_id)
            .map(|(_, upstream)| *upstream)
    }

    /// Map a public model id to the upstream id, falling back to the default
    /// upstream model for unknown ids.
    pub fn resolve(&self, public_id: &str) -> &'static str {
        match self.lookup(public_id) {
            Some(upstream) => upstream,
            None => {
                info!(
                    requested = public_id,
                    fallback = self.fallback,
                    "Model not found in mapping, using fallback"
                );
                self.fallback
            }
        }
    }

    /// `(public_id, upstream_id)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn fallback(&self) -> &'static str {
        self.fallback
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
