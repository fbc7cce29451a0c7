//! # Remote Recipe Providers
//!
//! Recipes of non-local ecosystems are discovered by talking to one external
//! provider process per ecosystem. The aggregation phase only depends on the
//! [`RecipeProvider`] capability, so the wire protocol is an implementation
//! detail of [`StdioRpcProvider`] and tests substitute in-memory fakes.
//!
//! Providers are not assumed to be safe for multiplexed use: every method
//! takes `&mut self` and completes one request before returning.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use log::{debug, warn};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::EcosystemConfig;
use crate::descriptor::RecipeDescriptor;
use crate::error::{Error, Result};

/// Value supplied for required options when preparing a recipe, so the
/// provider's validation accepts it and returns the full descriptor.
pub const PLACEHOLDER_OPTION_VALUE: &str = "PlaceholderValueToFoolValidation";

/// The operations a remote ecosystem must support.
pub trait RecipeProvider {
    /// Install a package into the provider. `None` installs the latest
    /// version. Returns the number of recipes the package contributed.
    fn install_package(&mut self, package: &str, version: Option<&str>) -> Result<usize>;

    /// List every recipe installed so far. Listings are accumulative.
    fn list_catalog(&mut self) -> Result<Vec<RecipeDescriptor>>;

    /// Instantiate a recipe with the given option values and return its
    /// fully resolved descriptor.
    fn prepare(&mut self, name: &str, options: &BTreeMap<String, Value>)
        -> Result<RecipeDescriptor>;

    /// Stop the provider. Called exactly once, on every path.
    fn shutdown(&mut self) -> Result<()>;
}

/// Starts one provider per ecosystem.
pub trait ProviderFactory: Send + Sync {
    fn start(&self, ecosystem: &EcosystemConfig) -> Result<Box<dyn RecipeProvider>>;
}

/// Owns a running provider and shuts it down when dropped.
///
/// This is the guaranteed-cleanup path: it runs whether the work done with
/// the provider returned normally, returned an error, or panicked.
pub struct ProviderSession {
    ecosystem: String,
    provider: Option<Box<dyn RecipeProvider>>,
}

impl ProviderSession {
    pub fn new(ecosystem: &str, provider: Box<dyn RecipeProvider>) -> Self {
        Self {
            ecosystem: ecosystem.to_string(),
            provider: Some(provider),
        }
    }

    pub fn provider(&mut self) -> Result<&mut dyn RecipeProvider> {
        match self.provider.as_mut() {
            Some(provider) => Ok(provider.as_mut()),
            None => Err(Error::Provider {
                ecosystem: self.ecosystem.clone(),
                operation: "use".to_string(),
                message: "provider already shut down".to_string(),
            }),
        }
    }

    /// Shut the provider down now, reporting failure to the caller.
    pub fn close(mut self) -> Result<()> {
        match self.provider.take() {
            Some(mut provider) => provider.shutdown(),
            None => Ok(()),
        }
    }
}

impl Drop for ProviderSession {
    fn drop(&mut self) {
        if let Some(mut provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                warn!("Failed to shut down {} provider: {}", self.ecosystem, e);
            }
        }
    }
}

/// Option values that satisfy every required option of `descriptor`.
pub fn placeholder_options(descriptor: &RecipeDescriptor) -> BTreeMap<String, Value> {
    descriptor
        .options
        .iter()
        .filter(|o| o.required)
        .map(|o| {
            (
                o.name.clone(),
                Value::String(PLACEHOLDER_OPTION_VALUE.to_string()),
            )
        })
        .collect()
}

/// Spawns the configured command for every ecosystem.
#[derive(Debug, Default)]
pub struct StdioRpcFactory;

impl ProviderFactory for StdioRpcFactory {
    fn start(&self, ecosystem: &EcosystemConfig) -> Result<Box<dyn RecipeProvider>> {
        Ok(Box::new(StdioRpcProvider::spawn(ecosystem)?))
    }
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    id: Option<u64>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstallResponse {
    recipes_installed: usize,
}

#[derive(Debug, Deserialize)]
struct PrepareResponse {
    descriptor: RecipeDescriptor,
}

/// Provider speaking newline-delimited JSON-RPC 2.0 over a child process's
/// stdin and stdout.
///
/// Methods: `InstallRecipes {package, version}`, `ListRecipes`,
/// `PrepareRecipe {id, options}`, and `Shutdown`. Lines on stdout that are
/// not responses to the pending request (notifications, stray output) are
/// skipped.
pub struct StdioRpcProvider {
    ecosystem: String,
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    next_id: u64,
}

impl StdioRpcProvider {
    pub fn spawn(ecosystem: &EcosystemConfig) -> Result<Self> {
        let (program, args) = ecosystem
            .command
            .split_first()
            .ok_or_else(|| provider_error(&ecosystem.name, "start", "empty command"))?;
        debug!("Starting {} provider: {}", ecosystem.name, ecosystem.command.join(" "));
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| provider_error(&ecosystem.name, "start", &e.to_string()))?;
        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| provider_error(&ecosystem.name, "start", "no stdout pipe"))?;
        Ok(Self {
            ecosystem: ecosystem.name.clone(),
            child,
            stdin,
            stdout: BufReader::new(stdout),
            next_id: 1,
        })
    }

    fn call(&mut self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| provider_error(&self.ecosystem, method, "stdin closed"))?;
        let mut line = serde_json::to_string(&request)?;
        line.push('\n');
        stdin
            .write_all(line.as_bytes())
            .and_then(|_| stdin.flush())
            .map_err(|e| provider_error(&self.ecosystem, method, &e.to_string()))?;

        loop {
            let mut buf = String::new();
            let read = self
                .stdout
                .read_line(&mut buf)
                .map_err(|e| provider_error(&self.ecosystem, method, &e.to_string()))?;
            if read == 0 {
                return Err(provider_error(
                    &self.ecosystem,
                    method,
                    "provider exited before responding",
                ));
            }
            let Ok(response) = serde_json::from_str::<RpcResponse>(buf.trim()) else {
                debug!("{} provider: {}", self.ecosystem, buf.trim_end());
                continue;
            };
            if response.id != Some(id) {
                continue;
            }
            if let Some(error) = response.error {
                return Err(provider_error(
                    &self.ecosystem,
                    method,
                    &format!("{} (code {})", error.message, error.code),
                ));
            }
            return Ok(response.result.unwrap_or(Value::Null));
        }
    }
}

impl RecipeProvider for StdioRpcProvider {
    fn install_package(&mut self, package: &str, version: Option<&str>) -> Result<usize> {
        let result = self.call(
            "InstallRecipes",
            json!({ "package": package, "version": version }),
        )?;
        let response: InstallResponse = serde_json::from_value(result)?;
        Ok(response.recipes_installed)
    }

    fn list_catalog(&mut self) -> Result<Vec<RecipeDescriptor>> {
        let result = self.call("ListRecipes", json!({}))?;
        Ok(serde_json::from_value(result)?)
    }

    fn prepare(
        &mut self,
        name: &str,
        options: &BTreeMap<String, Value>,
    ) -> Result<RecipeDescriptor> {
        let result = self.call("PrepareRecipe", json!({ "id": name, "options": options }))?;
        let response: PrepareResponse = serde_json::from_value(result)?;
        Ok(response.descriptor)
    }

    fn shutdown(&mut self) -> Result<()> {
        if let Err(e) = self.call("Shutdown", json!({})) {
            debug!("{} provider did not acknowledge shutdown: {}", self.ecosystem, e);
        }
        // Closing stdin lets a well-behaved provider exit on EOF.
        self.stdin.take();
        if self
            .child
            .try_wait()
            .map_err(|e| provider_error(&self.ecosystem, "shutdown", &e.to_string()))?
            .is_none()
        {
            self.child
                .kill()
                .map_err(|e| provider_error(&self.ecosystem, "shutdown", &e.to_string()))?;
        }
        self.child
            .wait()
            .map_err(|e| provider_error(&self.ecosystem, "shutdown", &e.to_string()))?;
        Ok(())
    }
}

fn provider_error(ecosystem: &str, operation: &str, message: &str) -> Error {
    Error::Provider {
        ecosystem: ecosystem.to_string(),
        operation: operation.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::OptionDescriptor;
    use std::sync::{Arc, Mutex};

    struct CountingProvider {
        shutdowns: Arc<Mutex<usize>>,
    }

    impl RecipeProvider for CountingProvider {
        fn install_package(&mut self, _: &str, _: Option<&str>) -> Result<usize> {
            Ok(0)
        }
        fn list_catalog(&mut self) -> Result<Vec<RecipeDescriptor>> {
            Ok(Vec::new())
        }
        fn prepare(&mut self, name: &str, _: &BTreeMap<String, Value>) -> Result<RecipeDescriptor> {
            Ok(RecipeDescriptor::named(name))
        }
        fn shutdown(&mut self) -> Result<()> {
            *self.shutdowns.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[test]
    fn test_placeholder_options_only_required() {
        let mut descriptor = RecipeDescriptor::named("org.openrewrite.python.ChangeImport");
        descriptor.options = vec![
            OptionDescriptor {
                name: "oldModule".to_string(),
                required: true,
                ..Default::default()
            },
            OptionDescriptor {
                name: "alias".to_string(),
                required: false,
                ..Default::default()
            },
        ];
        let options = placeholder_options(&descriptor);
        assert_eq!(options.len(), 1);
        assert_eq!(
            options["oldModule"],
            Value::String(PLACEHOLDER_OPTION_VALUE.to_string())
        );
    }

    #[test]
    fn test_session_shuts_down_on_drop() {
        let shutdowns = Arc::new(Mutex::new(0));
        {
            let mut session = ProviderSession::new(
                "python",
                Box::new(CountingProvider {
                    shutdowns: shutdowns.clone(),
                }),
            );
            session.provider().unwrap().list_catalog().unwrap();
        }
        assert_eq!(*shutdowns.lock().unwrap(), 1);
    }

    #[test]
    fn test_session_close_shuts_down_once() {
        let shutdowns = Arc::new(Mutex::new(0));
        let session = ProviderSession::new(
            "python",
            Box::new(CountingProvider {
                shutdowns: shutdowns.clone(),
            }),
        );
        session.close().unwrap();
        assert_eq!(*shutdowns.lock().unwrap(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_stdio_provider_round_trip() {
        // A provider that answers every request with a fixed install count.
        let script = r#"while read line; do id=$(echo "$line" | sed -n 's/.*"id":\([0-9]*\).*/\1/p'); echo "log line"; echo "{\"jsonrpc\":\"2.0\",\"id\":$id,\"result\":{\"recipesInstalled\":3}}"; done"#;
        let ecosystem = EcosystemConfig {
            name: "shell".to_string(),
            source_scheme: "shell-search".to_string(),
            command: vec!["sh".to_string(), "-c".to_string(), script.to_string()],
            name_prefix: "org.openrewrite.".to_string(),
            include_unpinned: false,
            catalog_per_package: false,
            modules: Vec::new(),
        };
        let mut provider = StdioRpcProvider::spawn(&ecosystem).unwrap();
        assert_eq!(provider.install_package("pkg", Some("1.0.0")).unwrap(), 3);
        provider.shutdown().unwrap();
    }

    #[test]
    fn test_spawn_missing_program_is_provider_error() {
        let ecosystem = EcosystemConfig {
            name: "missing".to_string(),
            source_scheme: "missing-search".to_string(),
            command: vec!["definitely-not-a-real-provider-binary".to_string()],
            name_prefix: "org.openrewrite.".to_string(),
            include_unpinned: false,
            catalog_per_package: false,
            modules: Vec::new(),
        };
        match StdioRpcProvider::spawn(&ecosystem) {
            Err(e) => assert!(e.is_recoverable()),
            Ok(_) => panic!("spawn should fail"),
        }
    }
}
