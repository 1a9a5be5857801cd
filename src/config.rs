/// Nesting limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 2048;

/// Limits applied while parsing a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Deepest group nesting the parser will descend into.
    max_depth: usize,
    /// Deepest tree (see [`crate::Regex::depth`]) the parser will hand back.
    /// Differentiation and dropping a tree recurse this deep. Unset by default,
    /// since a long flat pattern nests as deep as it is long.
    max_tree_depth: Option<usize>,
}

impl Config {
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub const fn max_tree_depth(&self) -> Option<usize> {
        self.max_tree_depth
    }

    pub const fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub const fn const_default() -> Self {
        Config {
            max_depth: DEFAULT_MAX_DEPTH,
            max_tree_depth: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::const_default()
    }
}

#[derive(Debug)]
pub struct ConfigBuilder(Config);

impl ConfigBuilder {
    pub const fn new() -> ConfigBuilder {
        ConfigBuilder(Config::const_default())
    }

    pub const fn build(self) -> Config {
        self.0
    }

    pub const fn max_depth(mut self, max_depth: usize) -> ConfigBuilder {
        self.0.max_depth = max_depth;
        self
    }

    pub const fn max_tree_depth(mut self, max_tree_depth: usize) -> ConfigBuilder {
        self.0.max_tree_depth = Some(max_tree_depth);
        self
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        ConfigBuilder::new()
    }
}
