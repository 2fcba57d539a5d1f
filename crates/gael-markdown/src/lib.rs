//! Read and write the gael catalog markdown format.
//!
//! A catalog is a set of numbered markdown documents. Each document holds
//! sections, sections hold entries and subsections, subsections hold
//! entries. Authors write entries in several dialects (canonical headers,
//! bold names, bullet lists, tables, cross-references); the parser accepts
//! all of them and produces one normalized tree.
//!
//! ```
//! use gael_markdown::{DocumentData, generate_document, parse_document};
//!
//! let text = "# 01 — Kernels\n\n## Linux\n\n- `linux` — the kernel\n";
//! let doc = parse_document(text, "01-kernels.md");
//! assert_eq!(doc.entry_count(), 1);
//!
//! let canonical = generate_document(&DocumentData::from(&doc));
//! assert!(canonical.contains("### linux → `linux`"));
//! assert_eq!(parse_document(&canonical, "01-kernels.md"), doc);
//! ```
//!
//! Generated text is canonical: parsing it again yields the same records.

pub mod batch;
pub mod fields;
pub mod generator;
pub mod model;
pub mod parser;
pub mod records;
pub mod warning;

pub use batch::{SourceFile, count_entries, parse_all, parse_all_with_warnings};
pub use fields::{EntryField, FIELD_SYNONYMS};
pub use generator::{GeneratedFile, generate_all, generate_document};
pub use model::{
    EntryFields, ExtraFields, ParsedDocument, ParsedEntry, ParsedSection, ParsedSubsection,
    TableEntry,
};
pub use parser::{ParseReport, parse_document, parse_document_with_warnings};
pub use records::{
    DocumentData, DocumentRecord, EntryRecord, IntegrityError, RecordId, RecordSet, SectionData,
    SectionRecord, SubsectionData, SubsectionRecord,
};
pub use warning::ParseWarning;
