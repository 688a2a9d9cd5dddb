//! Billing CLI
//!
//! Command-line interface for the veterinary billing API.

use anyhow::Result;
use clap::{Parser, Subcommand};

use billing_client::BillingClient;
use billing_types::{Decimal, FacturaId, ServicioId};

#[derive(Parser)]
#[command(name = "billing")]
#[command(author, version, about = "Veterinary billing API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the billing API
    #[arg(long, env = "BILLING_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Service operations
    Servicio {
        #[command(subcommand)]
        action: ServicioCommands,
    },
    /// Invoice operations
    Factura {
        #[command(subcommand)]
        action: FacturaCommands,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum ServicioCommands {
    /// Register a service (replaces an existing one with the same id)
    Register {
        /// Service name
        nombre: String,
        /// Service cost, must be positive
        #[arg(long)]
        costo: Decimal,
        /// Explicit id; generated by the server when omitted
        #[arg(long)]
        id: Option<String>,
    },
    /// Get service details
    Get {
        /// Service ID
        id: String,
    },
    /// List all services
    List,
}

#[derive(Subcommand)]
enum FacturaCommands {
    /// Create an invoice from service ids
    Create {
        /// Service ids, in billing order (repeat an id to bill it twice)
        #[arg(required = true)]
        servicios: Vec<String>,
    },
    /// Get invoice details
    Get {
        /// Invoice ID
        id: String,
    },
    /// List all invoices
    List,
    /// Mark an invoice as paid
    Pay {
        /// Invoice ID
        id: String,
    },
    /// Delete an invoice
    Delete {
        /// Invoice ID
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = BillingClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Servicio { action } => match action {
            ServicioCommands::Register { nombre, costo, id } => {
                let servicio = client.register_servicio(id, &nombre, costo).await?;
                println!("{}", serde_json::to_string_pretty(&servicio)?);
            }
            ServicioCommands::Get { id } => {
                let servicio = client.get_servicio(&ServicioId::from(id)).await?;
                println!("{}", serde_json::to_string_pretty(&servicio)?);
            }
            ServicioCommands::List => {
                let servicios = client.list_servicios().await?;
                println!("{}", serde_json::to_string_pretty(&servicios)?);
            }
        },

        Commands::Factura { action } => match action {
            FacturaCommands::Create { servicios } => {
                let factura = client.create_factura(servicios).await?;
                println!("{}", serde_json::to_string_pretty(&factura)?);
            }
            FacturaCommands::Get { id } => {
                let factura = client.get_factura(&FacturaId::from(id)).await?;
                println!("{}", serde_json::to_string_pretty(&factura)?);
            }
            FacturaCommands::List => {
                let facturas = client.list_facturas().await?;
                println!("{}", serde_json::to_string_pretty(&facturas)?);
            }
            FacturaCommands::Pay { id } => {
                let factura = client.pay_factura(&FacturaId::from(id)).await?;
                println!("{}", serde_json::to_string_pretty(&factura)?);
            }
            FacturaCommands::Delete { id } => {
                let deleted = client.delete_factura(&FacturaId::from(id)).await?;
                println!("✓ {} ({})", deleted.message, deleted.id);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_factura_create_with_repeats() {
        let cli = Cli::try_parse_from(["billing", "factura", "create", "a", "b", "a"]).unwrap();
        match cli.command {
            Commands::Factura {
                action: FacturaCommands::Create { servicios },
            } => assert_eq!(servicios, vec!["a", "b", "a"]),
            _ => panic!("expected factura create"),
        }
    }

    #[test]
    fn test_parses_decimal_cost() {
        let cli = Cli::try_parse_from([
            "billing",
            "--api-url",
            "http://vet:8080",
            "servicio",
            "register",
            "Consulta",
            "--costo",
            "12500.50",
        ])
        .unwrap();
        assert_eq!(cli.api_url, "http://vet:8080");
        match cli.command {
            Commands::Servicio {
                action: ServicioCommands::Register { nombre, costo, id },
            } => {
                assert_eq!(nombre, "Consulta");
                assert_eq!(costo.to_string(), "12500.50");
                assert!(id.is_none());
            }
            _ => panic!("expected servicio register"),
        }
    }

    #[test]
    fn test_factura_create_requires_ids() {
        assert!(Cli::try_parse_from(["billing", "factura", "create"]).is_err());
    }
}
