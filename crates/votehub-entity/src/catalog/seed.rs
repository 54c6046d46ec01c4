//! The built-in naming catalog.

use super::model::{Catalog, Category};

impl Catalog {
    /// The seven built-in naming categories, ten seed names each.
    pub fn seeded() -> Self {
        Self {
            categories: seed_categories(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}

fn seed_categories() -> Vec<Category> {
    vec![
        Category::new(
            "hispanic",
            "HISPANA",
            "Cultura latina, bilingüe",
            &[
                "ConversaFlow",
                "AmigaAI",
                "MercadoMente",
                "CharlaCore",
                "PuenteMind",
                "VozInteligente",
                "ConectaMente",
                "HablaFlujo",
                "DialogoAI",
                "PlaticoFlow",
            ],
        ),
        Category::new(
            "speed",
            "VELOCIDAD",
            "48 horas, resultados rápidos",
            &[
                "VelocIA",
                "ExpresoMind",
                "RápidoFlow",
                "InstantMente",
                "TurboFlow",
                "SwiftCore",
                "AgilMente",
                "FlashFlow",
                "VelocidadAI",
                "ExpresoCore",
            ],
        ),
        Category::new(
            "modular",
            "MODULAR",
            "Multi-vertical, adaptable",
            &[
                "Camaleón",
                "AdaptaCore",
                "FlexiMente",
                "PolyFlow",
                "ShapeShift",
                "MultiFacet",
                "VariaCore",
                "OmniFlow",
                "FlexCore",
                "AdaptiveAI",
            ],
        ),
        Category::new(
            "regional",
            "LATAM TECH",
            "Innovación regional",
            &[
                "TropicalAI",
                "SiliconSur",
                "InnovaLatam",
                "TecnoTropico",
                "SurTech",
                "LatamMind",
                "TropicFlow",
                "RegionCore",
                "SouthFlow",
                "TierraAI",
            ],
        ),
        Category::new(
            "futuristic",
            "FUTURISTA",
            "Next-gen, AI avanzada",
            &[
                "SynapseFlow",
                "NeuralCore",
                "CogniMente",
                "QuantumFlow",
                "NexusAI",
                "ZenithCore",
                "EvolutionAI",
                "MetaFlow",
                "HyperCore",
                "ApexAI",
            ],
        ),
        Category::new(
            "value_es",
            "VALOR (ESP)",
            "Ahorro, ventas, ROI",
            &[
                "AhorroInteligente",
                "VentaMás",
                "TiempoLibre",
                "GananciaAI",
                "EficienciaMáxima",
                "ROI-Matic",
                "VentaFácil",
                "TiempoValioso",
                "CreceMás",
                "ProfitFlow",
            ],
        ),
        Category::new(
            "value_en",
            "VALOR (ENG)",
            "Time savings, growth",
            &[
                "TimeSaver",
                "SalesBoost",
                "EfficiencyPro",
                "ROI-Master",
                "ProfitMind",
                "TimeFree",
                "SalesFlow",
                "GrowthCore",
                "RevenueAI",
                "ValueFlow",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog_satisfies_invariants() {
        let seeded = Catalog::seeded();
        let rebuilt = Catalog::new(seeded.iter().cloned().collect()).unwrap();
        assert_eq!(rebuilt, seeded);
        assert_eq!(seeded.len(), 7);
        assert!(seeded.iter().all(|c| c.seed_names.len() == 10));
    }
}
