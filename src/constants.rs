//! Application constants for the FMPXMLRESULT importer
//!
//! Element and attribute names of the export grammar, plus default values
//! used throughout the importer.

// =============================================================================
// Export Grammar Elements
// =============================================================================

pub mod elements {
    pub const FMPXMLRESULT: &str = "FMPXMLRESULT";
    pub const ERRORCODE: &str = "ERRORCODE";
    pub const PRODUCT: &str = "PRODUCT";
    pub const DATABASE: &str = "DATABASE";
    pub const METADATA: &str = "METADATA";
    pub const FIELD: &str = "FIELD";
    pub const RESULTSET: &str = "RESULTSET";
    pub const ROW: &str = "ROW";
    pub const COL: &str = "COL";
    pub const DATA: &str = "DATA";

    /// Every element defined by the grammar
    pub const ALL: &[&str] = &[
        FMPXMLRESULT,
        ERRORCODE,
        PRODUCT,
        DATABASE,
        METADATA,
        FIELD,
        RESULTSET,
        ROW,
        COL,
        DATA,
    ];

    /// Elements whose character data is kept. Text anywhere else is
    /// inter-element whitespace.
    pub const TEXT_BEARING: &[&str] = &[ROW, COL, DATA, ERRORCODE];
}

// =============================================================================
// Attribute Names
// =============================================================================

pub mod attributes {
    // FIELD
    pub const NAME: &str = "NAME";
    pub const TYPE: &str = "TYPE";
    pub const MAX_REPEAT: &str = "MAXREPEAT";
    pub const EMPTY_OK: &str = "EMPTYOK";

    // DATABASE
    pub const LAYOUT: &str = "LAYOUT";
    pub const RECORDS: &str = "RECORDS";
    pub const DATE_FORMAT: &str = "DATEFORMAT";
    pub const TIME_FORMAT: &str = "TIMEFORMAT";

    // PRODUCT
    pub const VERSION: &str = "VERSION";
    pub const BUILD: &str = "BUILD";

    // ROW
    pub const RECORD_ID: &str = "RECORDID";
    pub const MOD_ID: &str = "MODID";

    /// EMPTYOK value meaning the field may be blank
    pub const YES: &str = "YES";
}

// =============================================================================
// Defaults
// =============================================================================

/// Default chrono pattern for DATE fields: four-digit year, month, day
pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d";

/// ERRORCODE text reported by a successful export
pub const EXPORT_OK_CODE: &str = "0";

/// Initial capacity for the reusable XML event buffer
pub const EVENT_BUFFER_CAPACITY: usize = 4096;
