//! # winmdscope Prelude
//!
//! The types needed to load a metadata file and decode its attributes, in one import.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all winmdscope operations
pub use crate::Error;

/// Classification of an [`Error`]
pub use crate::ErrorKind;

/// The result type used throughout winmdscope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Owning entry point for metadata files
pub use crate::MetadataStore;

/// The parsed metadata and the byte cursor used for every read
pub use crate::{metadata::view::MetadataView, Parser};

// ================================================================================================
// Tables
// ================================================================================================

/// Table identifiers and coded indices
pub use crate::metadata::tables::{CodedIndex, CodedIndexKind, TableId};

/// Raw rows of the tables the decoder reads
pub use crate::metadata::tables::{
    CustomAttributeRaw, FieldRaw, MemberRefRaw, MethodDefRaw, ParamRaw, TypeDefRaw, TypeRefRaw,
};

// ================================================================================================
// Type System
// ================================================================================================

/// Core type system components
pub use crate::metadata::typesystem::{
    ElementType, EnumType, MethodSignature, QualifiedName, Type, TypeReference, TypeResolver,
};

// ================================================================================================
// Custom Attributes
// ================================================================================================

/// The decoder and its extraction context
pub use crate::metadata::customattributes::{
    AttributeRecord, CustomAttributeDecoder, DecodedAttribute, ExtractionContext,
};

/// Decoded attribute values
pub use crate::metadata::customattributes::{
    ArgumentData, ArgumentValue, CustomAttributeValue, LazyString,
};

/// The per-category records
pub use crate::metadata::customattributes::{
    Architecture, FieldCustomAttributeData, MethodCustomAttributeData, ParamCustomAttributeData,
    TypeCustomAttributeData,
};

// ================================================================================================
// Events
// ================================================================================================

/// Events of generation pipelines and their listeners
pub use crate::events::{Event, EventListener, EventRecorder, LogListener};
