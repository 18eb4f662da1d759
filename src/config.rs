//! Configuração do vendomat carregada a partir de `vendomat.toml`.
//!
//! O catálogo de produtos é definido como uma tabela `[[product]]`.
//! Sem arquivo de configuração, a máquina usa o catálogo padrão embutido.

use std::path::Path;

use serde::Deserialize;

use crate::error::VendomatError;
use crate::state_machine::{Inventory, Product};

/// Uma entrada `[[product]]` do arquivo de configuração.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductEntry {
    /// Nome do produto no catálogo.
    pub name: String,
    /// Preço em centavos.
    pub price: u32,
    /// Unidades disponíveis. Zero significa esgotado desde o início.
    #[serde(default)]
    pub stock: u32,
}

/// Configuração de nível superior carregada de `vendomat.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct VendomatConfig {
    #[serde(rename = "product", default = "default_products")]
    pub products: Vec<ProductEntry>,
}

// Catálogo padrão quando não há arquivo de configuração.
fn default_products() -> Vec<ProductEntry> {
    vec![
        ProductEntry {
            name: "Cola".into(),
            price: 250,
            stock: 5,
        },
        ProductEntry {
            name: "Water".into(),
            price: 150,
            stock: 3,
        },
        // Esgotado de propósito: exercita o estado OUT_OF_STOCK.
        ProductEntry {
            name: "Sap".into(),
            price: 200,
            stock: 0,
        },
    ]
}

impl Default for VendomatConfig {
    fn default() -> Self {
        Self {
            products: default_products(),
        }
    }
}

impl VendomatConfig {
    /// Carrega a configuração de `vendomat.toml` no diretório atual.
    /// Usa o catálogo padrão se o arquivo não existir.
    pub fn load() -> Result<Self, VendomatError> {
        Self::load_from(Path::new("vendomat.toml"))
    }

    /// Carrega a configuração de um caminho específico.
    pub fn load_from(path: &Path) -> Result<Self, VendomatError> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<VendomatConfig>(&contents)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), VendomatError> {
        if self.products.is_empty() {
            return Err(VendomatError::Config(
                "empty catalogue: define at least one [[product]]".into(),
            ));
        }
        for (i, entry) in self.products.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(VendomatError::Config(format!(
                    "product #{} has an empty name",
                    i + 1
                )));
            }
            if self.products[..i].iter().any(|p| p.name == entry.name) {
                return Err(VendomatError::Config(format!(
                    "duplicate product '{}'",
                    entry.name
                )));
            }
        }
        Ok(())
    }

    /// Converte as entradas do arquivo no inventário do contexto.
    pub fn inventory(&self) -> Inventory {
        self.products
            .iter()
            .map(|entry| (entry.name.clone(), Product::new(entry.price, entry.stock)))
            .collect()
    }
}
