//! Input validation for planning requests.
//!
//! Checks structural integrity of resources, items and the planning window
//! before any computation starts. Detects:
//! - Duplicate IDs
//! - Malformed windows and non-positive item durations
//! - Overlapping availability windows and bookings
//! - Bookings outside availability
//! - Out-of-range coordinates
//! - Options mode with a pending item count other than one
//!
//! All problems are reported at once.

use std::collections::HashSet;

use crate::models::{Location, PlanningMode, PlanningRequest, Window};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A window ends before it starts (or the planning window is empty).
    InvalidWindow,
    /// An item has a zero or negative duration.
    InvalidDuration,
    /// Two availability windows of one resource overlap.
    OverlappingWindows,
    /// Two bookings of one resource overlap.
    OverlappingBookings,
    /// A booking does not lie within a single availability window.
    BookingOutsideAvailability,
    /// Latitude or longitude out of range.
    InvalidLocation,
    /// Options mode needs exactly one pending item.
    InvalidItemCount,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a planning request.
///
/// Checks:
/// 1. Options mode has exactly one pending item
/// 2. The planning window has positive length
/// 3. No duplicate resource or item IDs
/// 4. Availability windows are well-formed and pairwise disjoint
/// 5. Bookings are well-formed, disjoint and inside one availability window
/// 6. Item durations are positive
/// 7. All coordinates are in range
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_request(request: &PlanningRequest) -> ValidationResult {
    let mut errors = Vec::new();

    if request.mode == PlanningMode::Options && request.pending_plan_items.len() != 1 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidItemCount,
            format!(
                "Options mode requires exactly one pending item, got {}",
                request.pending_plan_items.len()
            ),
        ));
    }

    if request.planning_window.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidWindow,
            format!(
                "Planning window {} - {} is empty",
                request.planning_window.start, request.planning_window.end
            ),
        ));
    }

    let mut resource_ids = HashSet::new();
    for resource in &request.resources {
        if !resource_ids.insert(&resource.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate resource ID: {}", resource.id),
            ));
        }

        check_location(&resource.start_location, &format!("Resource '{}'", resource.id), &mut errors);

        for w in resource.windows.iter().filter(|w| w.end < w.start) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWindow,
                format!(
                    "Resource '{}' has a window ending before it starts ({} - {})",
                    resource.id, w.start, w.end
                ),
            ));
        }

        if let Some((a, b)) = first_overlap(&resource.windows) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OverlappingWindows,
                format!(
                    "Resource '{}' has overlapping availability windows starting {} and {}",
                    resource.id, a.start, b.start
                ),
            ));
        }

        for booking in &resource.bookings {
            if booking.window.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidWindow,
                    format!(
                        "Booking '{}' on resource '{}' is empty",
                        booking.item_id, resource.id
                    ),
                ));
            } else if !resource.windows.iter().any(|w| w.covers(&booking.window)) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::BookingOutsideAvailability,
                    format!(
                        "Booking '{}' on resource '{}' lies outside its availability",
                        booking.item_id, resource.id
                    ),
                ));
            }
            check_location(
                &booking.location,
                &format!("Booking '{}'", booking.item_id),
                &mut errors,
            );
        }

        let booked: Vec<Window> = resource.bookings.iter().map(|b| b.window).collect();
        if let Some((a, b)) = first_overlap(&booked) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OverlappingBookings,
                format!(
                    "Resource '{}' has overlapping bookings starting {} and {}",
                    resource.id, a.start, b.start
                ),
            ));
        }
    }

    let mut item_ids = HashSet::new();
    for item in &request.pending_plan_items {
        if !item_ids.insert(&item.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate item ID: {}", item.id),
            ));
        }

        if item.duration <= chrono::TimeDelta::zero() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Item '{}' has a non-positive duration", item.id),
            ));
        }

        check_location(&item.location, &format!("Item '{}'", item.id), &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_location(location: &Location, owner: &str, errors: &mut Vec<ValidationError>) {
    if !location.has_valid_coordinates() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidLocation,
            format!(
                "{owner} has invalid coordinates ({}, {})",
                location.latitude, location.longitude
            ),
        ));
    }
}

/// Finds a pair of overlapping windows, if any.
///
/// Sorts by start so only neighbours need comparing.
fn first_overlap(windows: &[Window]) -> Option<(Window, Window)> {
    let mut sorted: Vec<Window> = windows.iter().copied().filter(|w| !w.is_empty()).collect();
    sorted.sort();
    sorted
        .windows(2)
        .find(|pair| pair[0].overlaps(&pair[1]))
        .map(|pair| (pair[0], pair[1]))
}
