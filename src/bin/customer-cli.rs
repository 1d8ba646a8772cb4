use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "customer-cli")]
#[command(about = "Management CLI for the Customer Service REST API", long_about = None)]
struct Cli {
    #[arg(short, long, env = "CUSTOMER_SERVICE_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service liveness
    Health,
    /// List customers, optionally filtered
    List(Filters),
    /// Show one customer
    Get { id: i64 },
    /// Create a customer
    Create(Fields),
    /// Update some fields of a customer
    Update {
        id: i64,
        #[command(flatten)]
        fields: Fields,
    },
    /// Suspend a customer's account
    Suspend { id: i64 },
    /// Delete a customer
    Delete { id: i64 },
}

#[derive(Args)]
struct Fields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone_number: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    member_since: Option<String>,
}

#[derive(Args)]
struct Filters {
    #[command(flatten)]
    fields: Fields,
    /// active or suspended
    #[arg(long)]
    status: Option<String>,
}

impl Fields {
    fn pairs(&self) -> Vec<(&'static str, &String)> {
        [
            ("name", &self.name),
            ("address", &self.address),
            ("email", &self.email),
            ("phone_number", &self.phone_number),
            ("member_since", &self.member_since),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| (k, v)))
        .collect()
    }

    fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::List(filters) => {
            let mut query = filters.fields.pairs();
            if let Some(status) = &filters.status {
                query.push(("status", status));
            }
            client
                .get(format!("{}/customers", base))
                .query(&query)
                .send()
                .await?
        }
        Commands::Get { id } => client.get(format!("{}/customers/{}", base, id)).send().await?,
        Commands::Create(fields) => {
            client
                .post(format!("{}/customers", base))
                .json(&fields.to_json())
                .send()
                .await?
        }
        Commands::Update { id, fields } => {
            client
                .put(format!("{}/customers/{}", base, id))
                .json(&fields.to_json())
                .send()
                .await?
        }
        Commands::Suspend { id } => {
            client
                .put(format!("{}/customers/{}/suspend", base, id))
                .send()
                .await?
        }
        Commands::Delete { id } => {
            client
                .delete(format!("{}/customers/{}", base, id))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let text = res.text().await?;
    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
