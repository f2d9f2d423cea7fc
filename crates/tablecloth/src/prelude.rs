//! Prelude module - common imports for tablecloth users
//!
//! ```rust
//! use tablecloth::prelude::*;
//! ```

pub use crate::{
    build,
    compile,
    emit,
    BuildError,
    CellAddress,
    CellFormat,
    CellRange,
    Color,
    CompileOptions,
    CompileWarning,
    CompiledPackage,
    // Compiler output
    Directive,
    Error,
    ErrorStyle,
    // Schema model
    Field,
    FieldType,
    ListSource,
    Mode,
    Package,
    Platform,
    RecordingWriter,
    Result,
    RuleKind,
    // Writing
    SheetWriter,
    Table,
    ValidationRule,
    Value,
    WriteOp,
};
