//! Database controller wired from a YAML file
//!
//! Run: APP_USER=admin cargo run --example database
//!
//! The host's credentials are written into the context after loading, so
//! they never appear in the file.

use std::fmt;
use std::fs;

use confbind::{cast, BindingContext, ComponentDescriptor, ConfigError, Entry};
use url::Url;

const CONFIG: &str = r#"
app:
  controller:
    host:
      url: mysql://${DB_HOST}
      database_name: orders
      port: "3306"
    option_1: 10
    option_2: "20"
"#;

struct Host {
    scheme: String,
    host: String,
    database: String,
    port: Option<i64>,
    username: Option<String>,
    password: Option<String>,
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.scheme)?;
        if let Some(user) = &self.username {
            f.write_str(user)?;
            if let Some(password) = &self.password {
                write!(f, ":{}", "*".repeat(password.len()))?;
            }
            f.write_str("@")?;
        }
        f.write_str(&self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        write!(f, "/{}", self.database)
    }
}

struct DatabaseController {
    host: Host,
    option_1: String,
    option_2: i64,
}

fn database() -> ComponentDescriptor<Host> {
    ComponentDescriptor::new("database", |mut args| {
        let url = args.string("url")?;
        let parsed = Url::parse(&url).map_err(|e| ConfigError::construct("database", e))?;
        if !matches!(parsed.scheme(), "mysql" | "sqlite" | "mssql") {
            return Err(ConfigError::construct(
                "database",
                format!("scheme {} not supported", parsed.scheme()),
            ));
        }

        let host = Host {
            scheme: parsed.scheme().to_string(),
            host: parsed.host_str().unwrap_or_default().to_string(),
            database: args.string("database_name")?,
            port: args.opt_int("port")?,
            username: args.opt_string("username")?,
            password: args.opt_string("password")?,
        };
        args.finish()?;
        Ok(host)
    })
    .arg("url", cast::string())
    .arg("username", cast::string())
    .arg("password", cast::string())
    .arg("database_name", cast::string())
    .arg("port", cast::int())
}

fn database_controller() -> ComponentDescriptor<DatabaseController> {
    ComponentDescriptor::new("database_controller", |mut args| {
        Ok(DatabaseController {
            host: args.instance("host")?,
            option_1: args.string("option_1")?,
            option_2: args.int("option_2")?,
        })
    })
    .arg("host", database())
    .arg("option_1", cast::string())
    .arg("option_2", cast::int())
}

fn create_controller() -> Result<DatabaseController, ConfigError> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("config.yaml");
    fs::write(&file, CONFIG)?;

    let ctx = BindingContext::from_file(&file)?;
    let controller = ctx
        .get_path("app.controller")?
        .into_context()
        .ok_or_else(|| ConfigError::ExpectedMapping {
            path: "app.controller".into(),
            found: "scalar".into(),
        })?;

    let host = controller
        .get("host")
        .and_then(Entry::into_context)
        .ok_or_else(|| ConfigError::MissingKey {
            path: "app.controller.host".into(),
        })?;
    host.set(
        "username",
        std::env::var("APP_USER").unwrap_or_else(|_| "default_username".into()),
    )?;
    host.set(
        "password",
        std::env::var("APP_PASSWORD").unwrap_or_else(|_| "default_password".into()),
    )?;

    controller.instantiate(&database_controller())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if std::env::var_os("DB_HOST").is_none() {
        std::env::set_var("DB_HOST", "db.example.com");
    }

    match create_controller() {
        Ok(controller) => {
            println!("host:     {}", controller.host);
            println!("option_1: {:?}", controller.option_1);
            println!("option_2: {}", controller.option_2);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
