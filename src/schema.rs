//! Survey schema
//!
//! The single declaration of the survey's column roles, shared by the
//! training and prediction binaries. Columns are declared explicitly rather
//! than inferred from cell types, so an integer-coded categorical column can
//! never be silently misclassified.

/// How a survey column feeds the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Standardized and passed through as a single feature.
    Numeric,
    /// One-hot encoded over the categories seen at fit time.
    Categorical,
}

/// Declaration of a single survey column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// Column header, exactly as it appears in the CSV and JSON records.
    pub name: &'static str,
    pub role: ColumnRole,
    /// Numeric columns that clients are known to send as strings.
    /// Unparseable values become missing and are median-imputed downstream.
    pub coerce_from_string: bool,
}

impl ColumnSpec {
    const fn categorical(name: &'static str) -> Self {
        ColumnSpec {
            name,
            role: ColumnRole::Categorical,
            coerce_from_string: false,
        }
    }

    const fn numeric(name: &'static str) -> Self {
        ColumnSpec {
            name,
            role: ColumnRole::Numeric,
            coerce_from_string: false,
        }
    }
}

/// Name of the regression target column in the training CSV.
pub const TARGET_COLUMN: &str = "CarbonEmission";

/// The nineteen survey feature columns, in training order.
pub const COLUMNS: [ColumnSpec; 19] = [
    ColumnSpec::categorical("Body Type"),
    ColumnSpec::categorical("Sex"),
    ColumnSpec::categorical("Diet"),
    ColumnSpec::categorical("How Often Shower"),
    ColumnSpec::categorical("Heating Energy Source"),
    ColumnSpec::categorical("Transport"),
    ColumnSpec::categorical("Vehicle Type"),
    ColumnSpec::categorical("Social Activity"),
    ColumnSpec::numeric("Monthly Grocery Bill"),
    ColumnSpec::categorical("Frequency of Traveling by Air"),
    ColumnSpec {
        name: "Vehicle Monthly Distance Km",
        role: ColumnRole::Numeric,
        coerce_from_string: true,
    },
    ColumnSpec::categorical("Waste Bag Size"),
    ColumnSpec::numeric("Waste Bag Weekly Count"),
    ColumnSpec::numeric("How Long TV PC Daily Hour"),
    ColumnSpec::numeric("How Many New Clothes Monthly"),
    ColumnSpec::numeric("How Long Internet Daily Hour"),
    ColumnSpec::categorical("Energy efficiency"),
    ColumnSpec::categorical("Recycling"),
    ColumnSpec::categorical("Cooking_With"),
];

/// Look up a column declaration by name.
pub fn spec_of(name: &str) -> Option<&'static ColumnSpec> {
    COLUMNS.iter().find(|c| c.name == name)
}
