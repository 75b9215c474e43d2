//! Capture category detection.
//!
//! Looks at the declared sample types (and, failing that, the period type
//! and sample shape) to decide whether a capture holds CPU, heap, goroutine
//! or mutex data. Rules are tried in a fixed order and the first match wins.

use super::capture::Capture;
use super::schema::Category;
use crate::utils::config::{
    CPU_TYPE_NAMES, CPU_UNIT_NAMES, GOROUTINE_TYPE_NAMES, HEAP_OBJECT_TYPE_NAMES,
    HEAP_TYPE_NAMES, HEAP_UNIT_NAMES, MUTEX_COUNT_TYPE_NAME, MUTEX_TYPE_NAMES,
    MUTEX_UNIT_NAMES, TIME_UNIT_NAMES,
};
use crate::utils::error::ClassifyError;
use log::debug;

/// Which rule produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    /// Known (type, unit) pair
    SampleType,
    /// Unit of a sample type
    Unit,
    /// Declared period type
    PeriodType,
    /// Two values per sample plus a recognisable type name
    ValueCount,
}

/// Determine the category of a capture
///
/// **Public** - main entry point for classification
///
/// # Errors
/// * `ClassifyError::UnknownCategory` - no rule matched; carries the declared sample types
pub fn classify(capture: &Capture) -> Result<Category, ClassifyError> {
    classify_with_rule(capture).map(|(category, _)| category)
}

/// Like [`classify`], also reporting which rule fired
pub fn classify_with_rule(
    capture: &Capture,
) -> Result<(Category, ClassificationRule), ClassifyError> {
    let result = by_sample_type(capture)
        .map(|c| (c, ClassificationRule::SampleType))
        .or_else(|| by_unit(capture).map(|c| (c, ClassificationRule::Unit)))
        .or_else(|| by_period_type(capture).map(|c| (c, ClassificationRule::PeriodType)))
        .or_else(|| by_value_count(capture).map(|c| (c, ClassificationRule::ValueCount)));

    match result {
        Some((category, rule)) => {
            debug!("Classified capture as {} ({:?} rule)", category, rule);
            Ok((category, rule))
        }
        None => Err(ClassifyError::UnknownCategory(
            capture.describe_sample_types(),
        )),
    }
}

fn is_one_of(value: &str, names: &[&str]) -> bool {
    names.contains(&value)
}

fn by_sample_type(capture: &Capture) -> Option<Category> {
    capture.sample_types.iter().find_map(|st| {
        let (ty, unit) = (st.type_name.as_str(), st.unit.as_str());
        if is_one_of(ty, CPU_TYPE_NAMES) && is_one_of(unit, CPU_UNIT_NAMES) {
            Some(Category::Cpu)
        } else if is_one_of(ty, HEAP_TYPE_NAMES) {
            Some(Category::Heap)
        } else if is_one_of(ty, GOROUTINE_TYPE_NAMES) {
            Some(Category::Goroutine)
        } else if is_one_of(ty, MUTEX_TYPE_NAMES) {
            Some(Category::Mutex)
        } else {
            None
        }
    })
}

fn by_unit(capture: &Capture) -> Option<Category> {
    capture.sample_types.iter().find_map(|st| {
        let (ty, unit) = (st.type_name.as_str(), st.unit.as_str());
        if is_one_of(unit, TIME_UNIT_NAMES) && is_one_of(ty, CPU_TYPE_NAMES) {
            Some(Category::Cpu)
        } else if is_one_of(unit, HEAP_UNIT_NAMES) {
            Some(Category::Heap)
        } else if is_one_of(unit, MUTEX_UNIT_NAMES) {
            Some(Category::Mutex)
        } else {
            None
        }
    })
}

fn by_period_type(capture: &Capture) -> Option<Category> {
    capture
        .period_type
        .as_ref()
        .filter(|pt| is_one_of(&pt.type_name, CPU_TYPE_NAMES))
        .map(|_| Category::Cpu)
}

fn by_value_count(capture: &Capture) -> Option<Category> {
    if capture.samples.is_empty() || !capture.samples.iter().all(|s| s.values.len() == 2) {
        return None;
    }

    capture.sample_types.iter().find_map(|st| {
        if is_one_of(&st.type_name, HEAP_OBJECT_TYPE_NAMES) {
            Some(Category::Heap)
        } else if st.type_name == MUTEX_COUNT_TYPE_NAME {
            Some(Category::Mutex)
        } else {
            None
        }
    })
}
