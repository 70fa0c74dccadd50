//! The DevTools `Database` domain.
//!
//! [`DatabaseDomain`] ties the pieces together: peers attach through
//! `enable`, table listing and queries go through the [`ConnectionCache`],
//! and [`DevtoolsDomain::call`] decodes JSON parameters for transports that
//! only see method names and raw values.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use vitrine_store::{Store, StoreOpener};

use crate::{
    ConnectionCache, DATABASE_DOMAIN, DatabaseSession, ExecuteSqlRequest, ExecuteSqlResponse,
    GetDatabaseTableNamesRequest, GetDatabaseTableNamesResponse, InspectorConfig, InspectorError,
    Peer, PeerId, PeerRegistry, ResultSet, RpcError, SessionState, materialize, parse_query,
};

/// A set of remote procedures a transport can route calls to
pub trait DevtoolsDomain: Send + Sync {
    /// Domain name, the part of a method before the dot
    fn name(&self) -> &str;

    /// Method names, without the domain prefix
    fn methods(&self) -> &[&'static str];

    /// Invoke `method` on behalf of `peer`
    fn call(&self, peer: &Arc<dyn Peer>, method: &str, params: Value) -> Result<Value, RpcError>;
}

/// Method names of the `Database` domain
pub const DATABASE_METHODS: &[&str] = &["enable", "disable", "getDatabaseTableNames", "executeSQL"];

/// Serves the `Database` domain over an object store
pub struct DatabaseDomain<O>
where
    O: StoreOpener,
{
    cache: Arc<ConnectionCache<O>>,
    registry: PeerRegistry<DatabaseSession<O>>,
}

impl<O> DatabaseDomain<O>
where
    O: StoreOpener,
{
    /// A domain scanning and unlocking databases per `config`, opening them
    /// with `opener`
    pub fn new(config: InspectorConfig, opener: O) -> Self {
        let config = Arc::new(config);
        let cache = Arc::new(ConnectionCache::new(opener, config.clone()));
        let session = DatabaseSession::new(config, cache.clone());
        Self {
            cache,
            registry: PeerRegistry::new(session),
        }
    }

    /// Attach `peer`; it receives one `Database.addDatabase` event per
    /// database found. Enabling an attached peer again does nothing.
    pub fn enable(&self, peer: Arc<dyn Peer>) {
        self.registry.add(peer);
    }

    /// Detach the peer with `id`, closing every open handle
    pub fn disable(&self, id: PeerId) {
        self.registry.remove(id);
    }

    /// Names of the tables in a database, opening it if needed
    pub fn get_database_table_names(
        &self,
        request: GetDatabaseTableNamesRequest,
    ) -> Result<GetDatabaseTableNamesResponse, RpcError> {
        let store = self
            .cache
            .resolve(&request.database_id)
            .map_err(RpcError::internal)?;
        Ok(GetDatabaseTableNamesResponse {
            table_names: store.table_names(),
        })
    }

    /// Run a query. Every failure, including failing to open the database,
    /// is reported in the response's `sqlError`.
    pub fn execute_sql(&self, request: ExecuteSqlRequest) -> ExecuteSqlResponse {
        match self.query(&request) {
            Ok(result) => result.into(),
            Err(error) => {
                tracing::debug!(database = %request.database_id, %error, "Query failed");
                error.into()
            }
        }
    }

    fn query(&self, request: &ExecuteSqlRequest) -> Result<ResultSet, InspectorError> {
        let store = self.cache.resolve(&request.database_id)?;
        let query = parse_query(&*store, &request.query)?;
        Ok(materialize(&*store, query)?)
    }

    /// Whether any peer is attached
    pub fn state(&self) -> SessionState {
        SessionState::of(&self.registry)
    }

    /// Attached peers
    pub fn registry(&self) -> &PeerRegistry<DatabaseSession<O>> {
        &self.registry
    }

    /// Open store handles
    pub fn cache(&self) -> &ConnectionCache<O> {
        &self.cache
    }
}

impl<O> DevtoolsDomain for DatabaseDomain<O>
where
    O: StoreOpener,
{
    fn name(&self) -> &str {
        DATABASE_DOMAIN
    }

    fn methods(&self) -> &[&'static str] {
        DATABASE_METHODS
    }

    fn call(&self, peer: &Arc<dyn Peer>, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "enable" => {
                self.enable(peer.clone());
                Ok(Value::Object(Default::default()))
            }
            "disable" => {
                self.disable(peer.id());
                Ok(Value::Object(Default::default()))
            }
            "getDatabaseTableNames" => {
                let request = decode(params)?;
                encode(self.get_database_table_names(request)?)
            }
            "executeSQL" => {
                let request = decode(params)?;
                encode(self.execute_sql(request))
            }
            other => Err(RpcError::method_not_found(DATABASE_DOMAIN, other)),
        }
    }
}

fn decode<T>(params: Value) -> Result<T, RpcError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(params).map_err(RpcError::invalid_params)
}

fn encode<T>(response: T) -> Result<Value, RpcError>
where
    T: Serialize,
{
    serde_json::to_value(response).map_err(RpcError::internal)
}
