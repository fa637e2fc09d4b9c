//! The closed set of supported YANG statements.

use std::fmt;

/// One YANG statement kind.
///
/// Extension instances (any `prefix:keyword` statement) are represented by
/// [`StatementKind::Unknown`]; the as-written keyword stays on the declared
/// statement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatementKind {
    /// `module`
    Module,
    /// `submodule`
    Submodule,
    /// `yang-version`
    YangVersion,
    /// `namespace`
    Namespace,
    /// `prefix`
    Prefix,
    /// `import`
    Import,
    /// `include`
    Include,
    /// `belongs-to`
    BelongsTo,
    /// `revision`
    Revision,
    /// `revision-date`
    RevisionDate,
    /// `organization`
    Organization,
    /// `contact`
    Contact,
    /// `description`
    Description,
    /// `reference`
    Reference,
    /// `container`
    Container,
    /// `leaf`
    Leaf,
    /// `leaf-list`
    LeafList,
    /// `list`
    List,
    /// `key`
    Key,
    /// `unique`
    Unique,
    /// `choice`
    Choice,
    /// `case`
    Case,
    /// `grouping`
    Grouping,
    /// `uses`
    Uses,
    /// `augment`
    Augment,
    /// `typedef`
    Typedef,
    /// `type`
    Type,
    /// `identity`
    Identity,
    /// `base`
    Base,
    /// `feature`
    Feature,
    /// `if-feature`
    IfFeature,
    /// `rpc`
    Rpc,
    /// `input`
    Input,
    /// `output`
    Output,
    /// `config`
    Config,
    /// `mandatory`
    Mandatory,
    /// `presence`
    Presence,
    /// `status`
    Status,
    /// `units`
    Units,
    /// `default`
    Default,
    /// `min-elements`
    MinElements,
    /// `max-elements`
    MaxElements,
    /// `ordered-by`
    OrderedBy,
    /// `when`
    When,
    /// `must`
    Must,
    /// `error-message`
    ErrorMessage,
    /// `error-app-tag`
    ErrorAppTag,
    /// `fraction-digits`
    FractionDigits,
    /// `range`
    Range,
    /// `length`
    Length,
    /// `pattern`
    Pattern,
    /// `enum`
    Enum,
    /// `value`
    Value,
    /// `path`
    Path,
    /// `extension`
    Extension,
    /// `argument`
    Argument,
    /// An extension instance (`prefix:keyword`).
    Unknown,
}

impl StatementKind {
    /// Returns the canonical keyword text.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Submodule => "submodule",
            Self::YangVersion => "yang-version",
            Self::Namespace => "namespace",
            Self::Prefix => "prefix",
            Self::Import => "import",
            Self::Include => "include",
            Self::BelongsTo => "belongs-to",
            Self::Revision => "revision",
            Self::RevisionDate => "revision-date",
            Self::Organization => "organization",
            Self::Contact => "contact",
            Self::Description => "description",
            Self::Reference => "reference",
            Self::Container => "container",
            Self::Leaf => "leaf",
            Self::LeafList => "leaf-list",
            Self::List => "list",
            Self::Key => "key",
            Self::Unique => "unique",
            Self::Choice => "choice",
            Self::Case => "case",
            Self::Grouping => "grouping",
            Self::Uses => "uses",
            Self::Augment => "augment",
            Self::Typedef => "typedef",
            Self::Type => "type",
            Self::Identity => "identity",
            Self::Base => "base",
            Self::Feature => "feature",
            Self::IfFeature => "if-feature",
            Self::Rpc => "rpc",
            Self::Input => "input",
            Self::Output => "output",
            Self::Config => "config",
            Self::Mandatory => "mandatory",
            Self::Presence => "presence",
            Self::Status => "status",
            Self::Units => "units",
            Self::Default => "default",
            Self::MinElements => "min-elements",
            Self::MaxElements => "max-elements",
            Self::OrderedBy => "ordered-by",
            Self::When => "when",
            Self::Must => "must",
            Self::ErrorMessage => "error-message",
            Self::ErrorAppTag => "error-app-tag",
            Self::FractionDigits => "fraction-digits",
            Self::Range => "range",
            Self::Length => "length",
            Self::Pattern => "pattern",
            Self::Enum => "enum",
            Self::Value => "value",
            Self::Path => "path",
            Self::Extension => "extension",
            Self::Argument => "argument",
            Self::Unknown => "unknown",
        }
    }

    /// Looks up a core statement kind by keyword text.
    ///
    /// Returns `None` for unrecognized keywords, including all prefixed
    /// extension keywords.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        const ALL: &[StatementKind] = &[
            StatementKind::Module,
            StatementKind::Submodule,
            StatementKind::YangVersion,
            StatementKind::Namespace,
            StatementKind::Prefix,
            StatementKind::Import,
            StatementKind::Include,
            StatementKind::BelongsTo,
            StatementKind::Revision,
            StatementKind::RevisionDate,
            StatementKind::Organization,
            StatementKind::Contact,
            StatementKind::Description,
            StatementKind::Reference,
            StatementKind::Container,
            StatementKind::Leaf,
            StatementKind::LeafList,
            StatementKind::List,
            StatementKind::Key,
            StatementKind::Unique,
            StatementKind::Choice,
            StatementKind::Case,
            StatementKind::Grouping,
            StatementKind::Uses,
            StatementKind::Augment,
            StatementKind::Typedef,
            StatementKind::Type,
            StatementKind::Identity,
            StatementKind::Base,
            StatementKind::Feature,
            StatementKind::IfFeature,
            StatementKind::Rpc,
            StatementKind::Input,
            StatementKind::Output,
            StatementKind::Config,
            StatementKind::Mandatory,
            StatementKind::Presence,
            StatementKind::Status,
            StatementKind::Units,
            StatementKind::Default,
            StatementKind::MinElements,
            StatementKind::MaxElements,
            StatementKind::OrderedBy,
            StatementKind::When,
            StatementKind::Must,
            StatementKind::ErrorMessage,
            StatementKind::ErrorAppTag,
            StatementKind::FractionDigits,
            StatementKind::Range,
            StatementKind::Length,
            StatementKind::Pattern,
            StatementKind::Enum,
            StatementKind::Value,
            StatementKind::Path,
            StatementKind::Extension,
            StatementKind::Argument,
        ];
        ALL.iter().copied().find(|k| k.keyword() == keyword)
    }

    /// Returns true if this statement contributes a schema-tree node.
    ///
    /// The schema tree holds the data-bearing hierarchy; statements like
    /// `grouping` or `typedef` live in the statement tree only.
    #[must_use]
    pub const fn is_schema_tree(self) -> bool {
        matches!(
            self,
            Self::Container
                | Self::Leaf
                | Self::LeafList
                | Self::List
                | Self::Choice
                | Self::Case
                | Self::Rpc
                | Self::Input
                | Self::Output
        )
    }

    /// Returns true if this statement takes an argument.
    #[must_use]
    pub const fn takes_argument(self) -> bool {
        !matches!(self, Self::Input | Self::Output)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
