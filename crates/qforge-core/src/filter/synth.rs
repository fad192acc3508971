use crate::{
    config::AssemblerConfig,
    filter::ControlType,
    query::{ColumnRef, Condition},
    value::Value,
};
use std::fmt;

///
/// SkipReason
///
/// Why a filter contributed nothing. None of these are errors.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SkipReason {
    /// The request context carries no value under the filter id.
    NotRequested,
    NullValue,
    UnsupportedControl,
    /// The value cannot be read as the control type requires.
    MalformedValue,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotRequested => "not_requested",
            Self::NullValue => "null_value",
            Self::UnsupportedControl => "unsupported_control",
            Self::MalformedValue => "malformed_value",
        };
        write!(f, "{label}")
    }
}

/// Map a control type and value to a condition on `table.column`.
///
/// | control | condition |
/// |---|---|
/// | text, datalist | substring match |
/// | select, multiselect | membership, scalars wrapped as a singleton |
/// | boolean, number | equality against the integer coercion |
/// | date | date-truncated equality |
/// | daterange | date-truncated `BETWEEN from AND to`, split on the delimiter |
///
/// `Err` carries why no condition was produced; it is never fatal.
pub fn synthesize(
    table: &str,
    column: &str,
    control: &ControlType,
    value: &Value,
    config: &AssemblerConfig,
) -> Result<Condition, SkipReason> {
    if value.is_null() {
        return Err(SkipReason::NullValue);
    }

    let column = ColumnRef::new(table, column);

    match control {
        ControlType::Text | ControlType::Datalist => Ok(Condition::Contains {
            column,
            value: value.to_text(),
            mode: config.text_mode,
        }),

        ControlType::Select | ControlType::Multiselect => Ok(Condition::In {
            column,
            values: value.clone().into_list(),
        }),

        ControlType::Boolean | ControlType::Number => Ok(Condition::Eq {
            column,
            value: Value::Int(value.to_int()),
        }),

        ControlType::Date => {
            let date = value.to_date().ok_or(SkipReason::MalformedValue)?;

            Ok(Condition::DateEq { column, date })
        }

        ControlType::Daterange => {
            let raw = value.to_text();
            let (from, to) = raw
                .split_once(config.daterange_delimiter.as_str())
                .ok_or(SkipReason::MalformedValue)?;
            let from = Value::from(from).to_date().ok_or(SkipReason::MalformedValue)?;
            let to = Value::from(to).to_date().ok_or(SkipReason::MalformedValue)?;

            Ok(Condition::DateBetween { column, from, to })
        }

        ControlType::Other(_) => Err(SkipReason::UnsupportedControl),
    }
}
