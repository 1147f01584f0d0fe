use std::any::TypeId;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use super::{Direction, DirectionScope, JsonSerializer, Serializer};

/// The identity of a Rust type, plus its name for diagnostics.
///
/// Two keys are equal if they refer to the same [`TypeId`]: the name is never compared.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified name of the type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// A `(type, direction)` pair, the unit of serializer resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDirectionKey {
    /// The type being (de)serialized.
    pub type_key: TypeKey,
    /// Whether the type is being read from a response or written into a request.
    pub direction: Direction,
}

impl TypeDirectionKey {
    pub fn new(type_key: TypeKey, direction: Direction) -> Self {
        Self {
            type_key,
            direction,
        }
    }

    /// The key for `T` in the given direction.
    pub fn of<T: ?Sized + 'static>(direction: Direction) -> Self {
        Self::new(TypeKey::of::<T>(), direction)
    }
}

#[derive(Clone)]
struct RegistryState {
    entries: HashMap<(TypeKey, DirectionScope), Arc<dyn Serializer>>,
    inbound_default: Arc<dyn Serializer>,
    outbound_default: Arc<dyn Serializer>,
}

impl RegistryState {
    fn default_for(&self, direction: Direction) -> &Arc<dyn Serializer> {
        match direction {
            Direction::Inbound => &self.inbound_default,
            Direction::Outbound => &self.outbound_default,
        }
    }

    fn lookup(&self, type_key: TypeKey, direction: Direction) -> &Arc<dyn Serializer> {
        self.entries
            .get(&(type_key, direction.into()))
            .or_else(|| self.entries.get(&(type_key, DirectionScope::Both)))
            .unwrap_or_else(|| self.default_for(direction))
    }
}

/// Decides which [`Serializer`] handles a given type, in a given direction.
///
/// Check out the [module-level documentation](super) for the resolution rules.
///
/// # Concurrency
///
/// The registry is meant to be shared (e.g. behind an `Arc`) by every compiler and decoder
/// of a client.
/// Reads never block: they load a snapshot of the current mappings.
/// Mutations are serialized against each other and publish a new snapshot, visible to
/// every subsequent resolution on any thread.
pub struct SerializerRegistry {
    state: ArcSwap<RegistryState>,
    write_lock: Mutex<()>,
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SerializerRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state.load();
        f.debug_struct("SerializerRegistry")
            .field("entries", &state.entries.len())
            .field("inbound_default", &state.inbound_default)
            .field("outbound_default", &state.outbound_default)
            .finish()
    }
}

impl SerializerRegistry {
    /// A registry without any type-specific registration, falling back to
    /// [`JsonSerializer`] in both directions.
    pub fn new() -> Self {
        Self::with_default(JsonSerializer::new())
    }

    /// A registry falling back to `serializer` in both directions.
    pub fn with_default<S: Serializer>(serializer: S) -> Self {
        let serializer: Arc<dyn Serializer> = Arc::new(serializer);
        Self {
            state: ArcSwap::from_pointee(RegistryState {
                entries: HashMap::new(),
                inbound_default: serializer.clone(),
                outbound_default: serializer,
            }),
            write_lock: Mutex::new(()),
        }
    }

    /// Use `serializer` for `T` in the given scope.
    ///
    /// An existing registration for the same `(T, scope)` pair is replaced.
    /// Registering for [`DirectionScope::Both`] doesn't affect direction-specific
    /// registrations for `T`: they still take precedence.
    pub fn register<T: ?Sized + 'static>(
        &self,
        scope: DirectionScope,
        serializer: impl Serializer,
    ) -> &Self {
        self.register_shared::<T>(scope, Arc::new(serializer))
    }

    /// Like [`register`](Self::register), for a serializer instance that is already shared.
    pub fn register_shared<T: ?Sized + 'static>(
        &self,
        scope: DirectionScope,
        serializer: Arc<dyn Serializer>,
    ) -> &Self {
        let type_key = TypeKey::of::<T>();
        tracing::debug!(
            type_name = type_key.name(),
            direction = ?scope,
            content_type = serializer.content_type(),
            "Registering a serializer"
        );
        self.update(|state| {
            state.entries.insert((type_key, scope), serializer);
        });
        self
    }

    /// Remove the registrations for `T`.
    ///
    /// With `Some(direction)`, only the registration for that exact direction is removed:
    /// `T` falls back to its [`DirectionScope::Both`] registration, if any, and then to the
    /// registry default.
    /// With `None`, every registration for `T` is removed.
    ///
    /// Removing a registration that doesn't exist is a no-op.
    pub fn unregister<T: ?Sized + 'static>(&self, direction: Option<Direction>) -> &Self {
        let type_key = TypeKey::of::<T>();
        tracing::debug!(
            type_name = type_key.name(),
            direction = ?direction,
            "Unregistering serializers"
        );
        self.update(|state| match direction {
            Some(direction) => {
                state.entries.remove(&(type_key, direction.into()));
            }
            None => {
                for scope in [
                    DirectionScope::Inbound,
                    DirectionScope::Outbound,
                    DirectionScope::Both,
                ] {
                    state.entries.remove(&(type_key, scope));
                }
            }
        });
        self
    }

    /// Change the fallback serializer for the given scope.
    pub fn set_default(&self, scope: DirectionScope, serializer: impl Serializer) -> &Self {
        let serializer: Arc<dyn Serializer> = Arc::new(serializer);
        tracing::debug!(
            direction = ?scope,
            content_type = serializer.content_type(),
            "Changing the default serializer"
        );
        self.update(|state| match scope {
            DirectionScope::Inbound => state.inbound_default = serializer,
            DirectionScope::Outbound => state.outbound_default = serializer,
            DirectionScope::Both => {
                state.inbound_default = serializer.clone();
                state.outbound_default = serializer;
            }
        });
        self
    }

    /// The fallback serializer for the given direction.
    pub fn default_for(&self, direction: Direction) -> Arc<dyn Serializer> {
        self.state.load().default_for(direction).clone()
    }

    /// The serializer for `T` in the given direction.
    pub fn resolve<T: ?Sized + 'static>(&self, direction: Direction) -> Arc<dyn Serializer> {
        self.resolve_key(&TypeDirectionKey::of::<T>(direction))
    }

    /// The serializer for a `(type, direction)` pair.
    ///
    /// The returned instance stays the same until the registry is mutated.
    pub fn resolve_key(&self, key: &TypeDirectionKey) -> Arc<dyn Serializer> {
        self.state.load().lookup(key.type_key, key.direction).clone()
    }

    /// The inbound serializer for `T`, taking the `Content-Type` of the response into account.
    ///
    /// If the serializer [`resolve`](Self::resolve) would return doesn't match
    /// `content_type`, we look for another serializer registered for `T`, and then among the
    /// registry defaults, whose content type matches.
    /// If nothing matches, or `content_type` is `None` or unparseable, the result of
    /// [`resolve`](Self::resolve) is returned.
    pub fn resolve_for_content_type<T: ?Sized + 'static>(
        &self,
        content_type: Option<&str>,
    ) -> Arc<dyn Serializer> {
        let type_key = TypeKey::of::<T>();
        let state = self.state.load();
        let resolved = state.lookup(type_key, Direction::Inbound);
        let Some(expected) = content_type.and_then(|c| c.parse::<mime::Mime>().ok()) else {
            return resolved.clone();
        };
        let candidates = [
            DirectionScope::Inbound,
            DirectionScope::Both,
            DirectionScope::Outbound,
        ]
        .into_iter()
        .filter_map(|scope| state.entries.get(&(type_key, scope)));
        std::iter::once(resolved)
            .chain(candidates)
            .chain([&state.inbound_default, &state.outbound_default])
            .find(|s| same_essence(s.content_type(), &expected))
            .unwrap_or(resolved)
            .clone()
    }

    /// Reconfigure every registered instance of the serializer type `S`.
    ///
    /// Each instance is cloned, mutated via `mutator` and swapped in place of the original:
    /// serializers are never mutated while they might be in use.
    /// An instance registered under several keys is cloned once and stays shared.
    ///
    /// If no instance of `S` is registered, `S::default()` is mutated and installed as the
    /// default for both directions.
    ///
    /// `mutator` runs before the write lock is taken, so it can use the registry.
    /// Instances of `S` registered while it runs are left untouched.
    pub fn configure<S, F>(&self, mut mutator: F) -> &Self
    where
        S: Serializer + Clone + Default,
        F: FnMut(&mut S),
    {
        let serializer_name = std::any::type_name::<S>();
        let snapshot = self.state.load_full();
        let mut replaced: Vec<(Arc<dyn Serializer>, Arc<dyn Serializer>)> = Vec::new();
        let slots = snapshot
            .entries
            .values()
            .chain([&snapshot.inbound_default, &snapshot.outbound_default]);
        for slot in slots {
            let Some(current) = slot.downcast_ref::<S>() else {
                continue;
            };
            if replaced.iter().any(|(old, _)| Arc::ptr_eq(old, slot)) {
                continue;
            }
            let mut copy = current.clone();
            mutator(&mut copy);
            let new: Arc<dyn Serializer> = Arc::new(copy);
            replaced.push((slot.clone(), new));
        }

        if replaced.is_empty() {
            tracing::debug!(
                serializer = serializer_name,
                "No registered instance to reconfigure, installing a new default"
            );
            let mut fresh = S::default();
            mutator(&mut fresh);
            let fresh: Arc<dyn Serializer> = Arc::new(fresh);
            self.update(|state| {
                state.inbound_default = fresh.clone();
                state.outbound_default = fresh;
            });
            return self;
        }

        tracing::debug!(
            serializer = serializer_name,
            instances = replaced.len(),
            "Reconfigured serializer instances"
        );
        self.update(|state| {
            let swap = |slot: &mut Arc<dyn Serializer>| {
                if let Some((_, new)) = replaced.iter().find(|(old, _)| Arc::ptr_eq(old, slot)) {
                    *slot = new.clone();
                }
            };
            for slot in state.entries.values_mut() {
                swap(slot);
            }
            swap(&mut state.inbound_default);
            swap(&mut state.outbound_default);
        });
        self
    }

    /// Apply `f` to a private copy of the current state, then publish it.
    fn update(&self, f: impl FnOnce(&mut RegistryState)) {
        let _guard = self.write_lock.lock();
        let mut next = RegistryState::clone(&self.state.load());
        f(&mut next);
        self.state.store(Arc::new(next));
    }
}

fn same_essence(content_type: &str, expected: &mime::Mime) -> bool {
    content_type
        .parse::<mime::Mime>()
        .is_ok_and(|m| m.essence_str() == expected.essence_str())
}
