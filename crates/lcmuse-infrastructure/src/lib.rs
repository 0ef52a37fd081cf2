//! Infrastructure for lcmuse: configuration, paths, logging, the script
//! archive and the remote identity and record services.

pub mod config_service;
pub mod firebase_identity;
pub mod firestore_history;
pub mod logging;
pub mod paths;
pub mod script_archiver;

pub use config_service::ConfigService;
pub use firebase_identity::FirebaseIdentityProvider;
pub use firestore_history::FirestoreHistoryStore;
pub use paths::LcmusePaths;
pub use script_archiver::FileScriptArchiver;
