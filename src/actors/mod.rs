pub mod actor_registry;
pub mod lobby_actor;
