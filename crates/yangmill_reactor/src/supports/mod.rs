//! Per-statement-kind support implementations.

mod data;
mod grouping;
mod linkage;
mod meta;
mod module;
mod rpc;
mod types;

use std::sync::Arc;

use crate::support::SupportBundle;

/// Declares a support with the default string-argument parse and no
/// phase hooks.
macro_rules! simple_support {
    ($name:ident, $kind:ident) => {
        pub(crate) struct $name;

        impl crate::support::StatementSupport for $name {
            fn kind(&self) -> yangmill_model::StatementKind {
                yangmill_model::StatementKind::$kind
            }
        }
    };
}

pub(crate) use simple_support;

/// Builds the bundle of supports covering the supported YANG statement
/// set.
#[must_use]
pub fn vanilla_bundle() -> SupportBundle {
    let mut bundle = SupportBundle::new(Arc::new(meta::UnknownSupport));

    // Module structure and linkage
    bundle.register(Arc::new(module::ModuleSupport::new()));
    bundle.register(Arc::new(module::SubmoduleSupport::new()));
    bundle.register(Arc::new(module::YangVersionSupport));
    bundle.register(Arc::new(module::NamespaceSupport));
    bundle.register(Arc::new(module::PrefixSupport));
    bundle.register(Arc::new(module::RevisionSupport));
    bundle.register(Arc::new(module::RevisionDateSupport));
    bundle.register(Arc::new(linkage::ImportSupport::new()));
    bundle.register(Arc::new(linkage::IncludeSupport::new()));
    bundle.register(Arc::new(linkage::BelongsToSupport::new()));

    // Data definition statements
    bundle.register(Arc::new(data::ContainerSupport::new()));
    bundle.register(Arc::new(data::LeafSupport::new()));
    bundle.register(Arc::new(data::LeafListSupport::new()));
    bundle.register(Arc::new(data::ListSupport::new()));
    bundle.register(Arc::new(data::KeySupport));
    bundle.register(Arc::new(data::ChoiceSupport::new()));
    bundle.register(Arc::new(data::CaseSupport::new()));

    // Reuse and augmentation
    bundle.register(Arc::new(grouping::GroupingSupport::new()));
    bundle.register(Arc::new(grouping::UsesSupport::new()));
    bundle.register(Arc::new(grouping::AugmentSupport::new()));

    // Types, identities, features
    bundle.register(Arc::new(types::TypedefSupport::new()));
    bundle.register(Arc::new(types::TypeSupport::new()));
    bundle.register(Arc::new(types::IdentitySupport::new()));
    bundle.register(Arc::new(types::BaseSupport));
    bundle.register(Arc::new(types::FeatureSupport::new()));
    bundle.register(Arc::new(types::IfFeatureSupport));
    bundle.register(Arc::new(types::ExtensionSupport::new()));
    bundle.register(Arc::new(types::ArgumentSupport));

    // Operations
    bundle.register(Arc::new(rpc::RpcSupport::new()));
    bundle.register(Arc::new(rpc::InputSupport::new()));
    bundle.register(Arc::new(rpc::OutputSupport::new()));

    // Metadata and per-node properties
    bundle.register(Arc::new(meta::DescriptionSupport));
    bundle.register(Arc::new(meta::ReferenceSupport));
    bundle.register(Arc::new(meta::OrganizationSupport));
    bundle.register(Arc::new(meta::ContactSupport));
    bundle.register(Arc::new(meta::PresenceSupport));
    bundle.register(Arc::new(meta::UnitsSupport));
    bundle.register(Arc::new(meta::DefaultSupport));
    bundle.register(Arc::new(meta::ConfigSupport));
    bundle.register(Arc::new(meta::MandatorySupport));
    bundle.register(Arc::new(meta::StatusSupport));
    bundle.register(Arc::new(meta::OrderedBySupport));
    bundle.register(Arc::new(meta::MinElementsSupport));
    bundle.register(Arc::new(meta::MaxElementsSupport));
    bundle.register(Arc::new(meta::FractionDigitsSupport));
    bundle.register(Arc::new(meta::WhenSupport));
    bundle.register(Arc::new(meta::MustSupport));
    bundle.register(Arc::new(meta::ErrorMessageSupport));
    bundle.register(Arc::new(meta::ErrorAppTagSupport));
    bundle.register(Arc::new(meta::RangeSupport));
    bundle.register(Arc::new(meta::LengthSupport));
    bundle.register(Arc::new(meta::PatternSupport));
    bundle.register(Arc::new(meta::EnumSupport));
    bundle.register(Arc::new(meta::ValueSupport));
    bundle.register(Arc::new(meta::PathSupport));
    bundle.register(Arc::new(meta::UniqueSupport));

    bundle
}
