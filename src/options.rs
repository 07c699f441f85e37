/// The major versions of the JSONH specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonhVersion {
    /// The latest implemented version (currently [`JsonhVersion::V2`]).
    #[default]
    Latest,
    /// Version 1 of the specification, released 2025/03/19.
    V1,
    /// Version 2 of the specification, released 2025/11/19. Adds verbatim
    /// strings, the `@` reserved rune and nestable block comments.
    V2,
}

impl JsonhVersion {
    fn rank(self) -> u8 {
        match self {
            JsonhVersion::V1 => 1,
            JsonhVersion::Latest | JsonhVersion::V2 => 2,
        }
    }
}

/// Options for a [`JsonhReader`](crate::JsonhReader).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonhReaderOptions {
    /// The major version of the JSONH specification to read with.
    pub version: JsonhVersion,
    /// When parsing (not when reading tokens), require the input to contain
    /// exactly one element, ignoring trailing comments and whitespace.
    pub parse_single_element: bool,
    /// Treat a premature end of input inside an object or array as the end
    /// of that container instead of an error. Useful for streamed responses;
    /// only containers can be incomplete, so it should not be relied upon.
    pub incomplete_inputs: bool,
    /// The maximum container nesting allowed, as a defence against
    /// resource-exhaustion inputs. The default is 64.
    pub max_depth: usize,
}

impl JsonhReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: JsonhVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_parse_single_element(mut self, parse_single_element: bool) -> Self {
        self.parse_single_element = parse_single_element;
        self
    }

    pub fn with_incomplete_inputs(mut self, incomplete_inputs: bool) -> Self {
        self.incomplete_inputs = incomplete_inputs;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns whether the configured version is at least `minimum`, with
    /// [`JsonhVersion::Latest`] resolving to the highest implemented version.
    pub fn supports_version(&self, minimum: JsonhVersion) -> bool {
        self.version.rank() >= minimum.rank()
    }
}

impl Default for JsonhReaderOptions {
    fn default() -> Self {
        Self {
            version: JsonhVersion::default(),
            parse_single_element: false,
            incomplete_inputs: false,
            max_depth: 64,
        }
    }
}
