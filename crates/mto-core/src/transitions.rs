//! Order status transition table.
//!
//! The single source of truth for which order status changes are allowed.
//! No other component may mutate `Order.status` outside a table-validated
//! transition; `Billed` and `Cancelled` are terminal.

use mto_types::OrderStatus;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Allowed-transition table: each status maps to its permitted targets.
static TRANSITIONS: Lazy<HashMap<OrderStatus, HashSet<OrderStatus>>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(
		OrderStatus::Created,
		HashSet::from([OrderStatus::InProduction, OrderStatus::Cancelled]),
	);
	m.insert(
		OrderStatus::InProduction,
		HashSet::from([OrderStatus::ReadyForDelivery, OrderStatus::Cancelled]),
	);
	m.insert(
		OrderStatus::ReadyForDelivery,
		HashSet::from([OrderStatus::Delivered, OrderStatus::Cancelled]),
	);
	m.insert(
		OrderStatus::Delivered,
		HashSet::from([OrderStatus::Billed]),
	);
	m.insert(OrderStatus::Billed, HashSet::new()); // terminal
	m.insert(OrderStatus::Cancelled, HashSet::new()); // terminal
	m
});

/// Checks if a status transition is allowed by the table.
pub fn is_allowed(from: OrderStatus, to: OrderStatus) -> bool {
	TRANSITIONS
		.get(&from)
		.is_some_and(|targets| targets.contains(&to))
}

#[cfg(test)]
mod tests {
	use super::*;
	use mto_types::OrderStatus::*;

	const ALL: [OrderStatus; 6] = [
		Created,
		InProduction,
		ReadyForDelivery,
		Delivered,
		Billed,
		Cancelled,
	];

	#[test]
	fn normal_flow_is_allowed_end_to_end() {
		let flow = [Created, InProduction, ReadyForDelivery, Delivered, Billed];
		for pair in flow.windows(2) {
			assert!(is_allowed(pair[0], pair[1]), "{} -> {}", pair[0], pair[1]);
		}
	}

	#[test]
	fn cancellation_is_allowed_until_delivered() {
		assert!(is_allowed(Created, Cancelled));
		assert!(is_allowed(InProduction, Cancelled));
		assert!(is_allowed(ReadyForDelivery, Cancelled));
		assert!(!is_allowed(Delivered, Cancelled));
	}

	#[test]
	fn terminal_statuses_have_no_targets() {
		for to in ALL {
			assert!(!is_allowed(Billed, to), "billed -> {}", to);
			assert!(!is_allowed(Cancelled, to), "cancelled -> {}", to);
		}
	}

	#[test]
	fn exactly_the_specified_pairs_are_allowed() {
		let allowed = [
			(Created, InProduction),
			(Created, Cancelled),
			(InProduction, ReadyForDelivery),
			(InProduction, Cancelled),
			(ReadyForDelivery, Delivered),
			(ReadyForDelivery, Cancelled),
			(Delivered, Billed),
		];

		for from in ALL {
			for to in ALL {
				let expected = allowed.contains(&(from, to));
				assert_eq!(is_allowed(from, to), expected, "{} -> {}", from, to);
			}
		}
	}
}
