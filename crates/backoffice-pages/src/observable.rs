//! Observable - explicit state-update-and-notify cell
//!
//! `Observable<T>` holds a value, a version counter that increases on every
//! write, and a list of subscribers notified after each write. There is no
//! implicit dependency tracking: a view re-renders when it is told to, and can
//! compare versions to skip work.
//!
//! ## Example
//!
//! ```
//! use backoffice_pages::Observable;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let title = Observable::new(String::new());
//! let renders = Rc::new(Cell::new(0));
//!
//! let id = title.subscribe({
//!     let renders = Rc::clone(&renders);
//!     move |_version| renders.set(renders.get() + 1)
//! });
//!
//! title.set("Pilot".to_string());
//! assert_eq!(title.get(), "Pilot");
//! assert_eq!(title.version(), 1);
//! assert_eq!(renders.get(), 1);
//!
//! title.unsubscribe(id);
//! title.update(|t| t.push('!'));
//! assert_eq!(renders.get(), 1);
//! ```

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Observable::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<dyn Fn(u64)>;

struct Inner<T> {
	value: RefCell<T>,
	version: Cell<u64>,
	next_subscription: Cell<u64>,
	subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
}

/// A shared value with a version counter and change subscriptions.
///
/// Clones share the same value, version and subscriber list.
pub struct Observable<T: 'static> {
	inner: Rc<Inner<T>>,
}

/// A value paired with the version it was read at
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
	pub version: u64,
	pub value: T,
}

impl<T: 'static> Observable<T> {
	pub fn new(value: T) -> Self {
		Self {
			inner: Rc::new(Inner {
				value: RefCell::new(value),
				version: Cell::new(0),
				next_subscription: Cell::new(0),
				subscribers: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Current value (cloned)
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.inner.value.borrow().clone()
	}

	/// Borrows the current value.
	///
	/// The borrow must be released before the next write.
	pub fn borrow(&self) -> Ref<'_, T> {
		self.inner.value.borrow()
	}

	/// Runs `f` against the current value.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.inner.value.borrow())
	}

	/// Value and version read together
	pub fn snapshot(&self) -> Snapshot<T>
	where
		T: Clone,
	{
		Snapshot {
			version: self.version(),
			value: self.get(),
		}
	}

	/// Number of writes so far
	pub fn version(&self) -> u64 {
		self.inner.version.get()
	}

	/// Replaces the value and notifies subscribers.
	pub fn set(&self, value: T) {
		*self.inner.value.borrow_mut() = value;
		self.bump();
	}

	/// Mutates the value in place and notifies subscribers.
	pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
		let result = f(&mut self.inner.value.borrow_mut());
		self.bump();
		result
	}

	/// Registers a subscriber called with the new version after each write.
	pub fn subscribe(&self, subscriber: impl Fn(u64) + 'static) -> SubscriptionId {
		let id = SubscriptionId(self.inner.next_subscription.get());
		self.inner.next_subscription.set(id.0 + 1);
		self.inner
			.subscribers
			.borrow_mut()
			.push((id, Rc::new(subscriber)));
		id
	}

	/// Removes a subscriber. Returns whether it was registered.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut subscribers = self.inner.subscribers.borrow_mut();
		let before = subscribers.len();
		subscribers.retain(|(sid, _)| *sid != id);
		subscribers.len() != before
	}

	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.borrow().len()
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}

	fn bump(&self) {
		let version = self.inner.version.get() + 1;
		self.inner.version.set(version);
		// Subscribers may read the value or subscribe again while notified.
		let subscribers: Vec<Subscriber> = self
			.inner
			.subscribers
			.borrow()
			.iter()
			.map(|(_, s)| Rc::clone(s))
			.collect();
		for subscriber in subscribers {
			subscriber(version);
		}
	}
}

impl<T: 'static> Clone for Observable<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: Default + 'static> Default for Observable<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Observable<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Observable")
			.field("value", &*self.inner.value.borrow())
			.field("version", &self.inner.version.get())
			.field("subscribers", &self.inner.subscribers.borrow().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_version_counts_writes() {
		// Arrange
		let counter = Observable::new(0);

		// Act
		counter.set(5);
		counter.update(|n| *n += 1);

		// Assert
		assert_eq!(counter.get(), 6);
		assert_eq!(counter.version(), 2);
	}

	#[rstest]
	fn test_clones_share_state() {
		let a = Observable::new(vec![1]);
		let b = a.clone();

		b.update(|v| v.push(2));

		assert_eq!(a.get(), vec![1, 2]);
		assert!(a.ptr_eq(&b));
	}

	#[rstest]
	fn test_subscriber_receives_version_and_can_read() {
		// Arrange
		let name = Observable::new(String::from("a"));
		let seen = Rc::new(RefCell::new(Vec::new()));
		let reader = name.clone();
		let log = Rc::clone(&seen);
		name.subscribe(move |version| log.borrow_mut().push((version, reader.get())));

		// Act
		name.set("b".into());
		name.set("c".into());

		// Assert
		assert_eq!(
			seen.borrow().as_slice(),
			[(1, "b".to_string()), (2, "c".to_string())]
		);
	}

	#[rstest]
	fn test_unsubscribe() {
		let obs = Observable::new(());
		let id = obs.subscribe(|_| {});
		assert_eq!(obs.subscriber_count(), 1);
		assert!(obs.unsubscribe(id));
		assert!(!obs.unsubscribe(id));
		assert_eq!(obs.subscriber_count(), 0);
	}

	#[rstest]
	fn test_snapshot_pairs_value_with_version() {
		let obs = Observable::new(1);
		obs.set(2);
		assert_eq!(obs.snapshot(), Snapshot { version: 1, value: 2 });
	}
}
