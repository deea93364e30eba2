//! Table of supported networks.

use std::collections::HashMap;

use super::chain::{ChainDescriptor, ChainId, ChainKind, NativeCurrency};
use crate::error::{RegistryError, RegistryResult};
use crate::provider::ProviderKind;

/// Providers able to drive any EVM chain.
const EVM_PROVIDERS: [ProviderKind; 3] = [
    ProviderKind::InjectedEvm,
    ProviderKind::AltEvm,
    ProviderKind::WalletConnect,
];

/// Lookup table of supported chains.
///
/// Immutable once built. Lookups are pure and synchronous.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    chains: Vec<ChainDescriptor>,
    by_id: HashMap<ChainId, usize>,
}

impl NetworkRegistry {
    /// Build a registry from descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if two descriptors share a chain id or slug,
    /// or a descriptor has an empty slug or name.
    pub fn new(chains: Vec<ChainDescriptor>) -> RegistryResult<Self> {
        let mut by_id = HashMap::with_capacity(chains.len());
        let mut slugs = HashMap::with_capacity(chains.len());

        for (index, chain) in chains.iter().enumerate() {
            if chain.slug.trim().is_empty() || chain.name.trim().is_empty() {
                return Err(RegistryError::Unnamed(chain.chain_id.to_string()));
            }
            if by_id.insert(chain.chain_id.clone(), index).is_some() {
                return Err(RegistryError::DuplicateChainId(chain.chain_id.to_string()));
            }
            if slugs.insert(chain.slug.to_ascii_lowercase(), index).is_some() {
                return Err(RegistryError::DuplicateSlug(chain.slug.clone()));
            }
        }

        Ok(Self { chains, by_id })
    }

    /// The built-in network table.
    #[must_use]
    pub fn builtin() -> Self {
        let chains = builtin_chains();
        let by_id = chains
            .iter()
            .enumerate()
            .map(|(index, chain)| (chain.chain_id.clone(), index))
            .collect();
        Self { chains, by_id }
    }

    /// Describe a chain by id.
    #[must_use]
    pub fn describe(&self, chain_id: &ChainId) -> Option<&ChainDescriptor> {
        self.by_id.get(chain_id).map(|&index| &self.chains[index])
    }

    /// Describe a chain by slug or display name, case-insensitively.
    #[must_use]
    pub fn describe_by_slug_or_name(&self, name: &str) -> Option<&ChainDescriptor> {
        let name = name.trim();
        self.chains
            .iter()
            .find(|c| c.slug.eq_ignore_ascii_case(name))
            .or_else(|| self.chains.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
    }

    /// Returns `true` if `chain_id` is known and `kind` may drive it.
    #[must_use]
    pub fn is_supported_by(&self, chain_id: &ChainId, kind: ProviderKind) -> bool {
        self.describe(chain_id).is_some_and(|chain| chain.allows(kind))
    }

    /// All chains `kind` may drive, in table order.
    pub fn supported_by(&self, kind: ProviderKind) -> impl Iterator<Item = &ChainDescriptor> {
        self.chains.iter().filter(move |chain| chain.allows(kind))
    }

    /// Iterate over all chains in table order.
    pub fn iter(&self) -> impl Iterator<Item = &ChainDescriptor> {
        self.chains.iter()
    }

    /// Number of chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

struct EvmChain {
    id: u64,
    name: &'static str,
    slug: &'static str,
    currency: (&'static str, &'static str),
    rpc: &'static str,
    explorer: &'static str,
    api: &'static str,
}

impl EvmChain {
    fn into_descriptor(self, extra: &[ProviderKind]) -> ChainDescriptor {
        let mut providers = EVM_PROVIDERS.to_vec();
        providers.extend_from_slice(extra);
        ChainDescriptor {
            chain_id: ChainId::Evm(self.id),
            name: self.name.to_owned(),
            slug: self.slug.to_owned(),
            kind: ChainKind::Evm,
            native_currency: NativeCurrency::new(self.currency.0, self.currency.1, 18),
            rpc_urls: vec![self.rpc.to_owned()],
            explorer_urls: vec![self.explorer.to_owned()],
            providers,
            explorer_api: Some(self.api.to_owned()),
        }
    }
}

fn builtin_chains() -> Vec<ChainDescriptor> {
    const ETH: (&str, &str) = ("Ethereum coin", "ETH");
    const BNB: (&str, &str) = ("Binance coin", "BNB");
    const MATIC: (&str, &str) = ("Polygon coin", "MATIC");
    const EXCHANGE: &[ProviderKind] = &[ProviderKind::ExchangeWallet];

    let evm = [
        (
            EvmChain {
                id: 1,
                name: "Ethereum",
                slug: "eth",
                currency: ETH,
                rpc: "https://cloudflare-eth.com",
                explorer: "https://etherscan.io",
                api: "https://api.etherscan.io/api?",
            },
            &[][..],
        ),
        (
            EvmChain {
                id: 3,
                name: "Ropsten",
                slug: "ropsten",
                currency: ETH,
                rpc: "https://rpc.ankr.com/eth_ropsten",
                explorer: "https://ropsten.etherscan.io",
                api: "https://api-ropsten.etherscan.io/api?",
            },
            &[][..],
        ),
        (
            EvmChain {
                id: 4,
                name: "Rinkeby",
                slug: "rinkeby",
                currency: ETH,
                rpc: "https://rpc.ankr.com/eth_rinkeby",
                explorer: "https://rinkeby.etherscan.io",
                api: "https://api-rinkeby.etherscan.io/api?",
            },
            &[][..],
        ),
        (
            EvmChain {
                id: 5,
                name: "Goerli",
                slug: "goerli",
                currency: ETH,
                rpc: "https://rpc.ankr.com/eth_goerli",
                explorer: "https://goerli.etherscan.io",
                api: "https://api-goerli.etherscan.io/api?",
            },
            &[][..],
        ),
        (
            EvmChain {
                id: 42,
                name: "Kovan",
                slug: "kovan",
                currency: ETH,
                rpc: "https://kovan.poa.network",
                explorer: "https://kovan.etherscan.io",
                api: "https://api-kovan.etherscan.io/api?",
            },
            &[][..],
        ),
        (
            EvmChain {
                id: 56,
                name: "Binance Smart Chain",
                slug: "bsc",
                currency: BNB,
                rpc: "https://bsc-dataseed.binance.org/",
                explorer: "https://bscscan.com",
                api: "https://api.bscscan.com/api?",
            },
            EXCHANGE,
        ),
        (
            EvmChain {
                id: 97,
                name: "BSC Testnet",
                slug: "bsc-testnet",
                currency: BNB,
                rpc: "https://data-seed-prebsc-1-s1.binance.org:8545/",
                explorer: "https://testnet.bscscan.com",
                api: "https://api-testnet.bscscan.com/api?",
            },
            EXCHANGE,
        ),
        (
            EvmChain {
                id: 137,
                name: "Polygon",
                slug: "polygon",
                currency: MATIC,
                rpc: "https://polygon-rpc.com/",
                explorer: "https://polygonscan.com",
                api: "https://api.polygonscan.com/api?",
            },
            &[][..],
        ),
        (
            EvmChain {
                id: 80001,
                name: "Polygon Mumbai",
                slug: "mumbai",
                currency: MATIC,
                rpc: "https://rpc-mumbai.maticvigil.com/",
                explorer: "https://mumbai.polygonscan.com",
                api: "https://api-testnet.polygonscan.com/api?",
            },
            &[][..],
        ),
    ];

    let mut chains: Vec<ChainDescriptor> = evm
        .into_iter()
        .map(|(chain, extra)| chain.into_descriptor(extra))
        .collect();

    chains.push(ChainDescriptor {
        chain_id: ChainId::tron(),
        name: "Tron".to_owned(),
        slug: "tron".to_owned(),
        kind: ChainKind::Tron,
        native_currency: NativeCurrency::new("Tron", "TRX", 6),
        rpc_urls: vec!["https://api.trongrid.io".to_owned()],
        explorer_urls: vec!["https://tronscan.org".to_owned()],
        providers: vec![ProviderKind::TronExtension],
        explorer_api: Some("https://apilist.tronscan.org/api/".to_owned()),
    });
    chains.push(ChainDescriptor {
        chain_id: ChainId::solana(),
        name: "Solana".to_owned(),
        slug: "solana".to_owned(),
        kind: ChainKind::Solana,
        native_currency: NativeCurrency::new("Solana", "SOL", 9),
        rpc_urls: vec!["https://api.mainnet-beta.solana.com".to_owned()],
        explorer_urls: vec!["https://solscan.io".to_owned()],
        providers: vec![ProviderKind::SolanaExtension],
        explorer_api: Some("https://public-api.solscan.io/".to_owned()),
    });

    chains
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let registry = NetworkRegistry::builtin();
        assert_eq!(registry.len(), 11);

        let bsc = registry.describe(&ChainId::Evm(56)).unwrap();
        assert_eq!(bsc.slug, "bsc");
        assert_eq!(bsc.native_currency.symbol, "BNB");

        assert!(registry.describe(&ChainId::Evm(999)).is_none());
    }

    #[test]
    fn test_describe_by_slug_or_name() {
        let registry = NetworkRegistry::builtin();
        assert_eq!(
            registry.describe_by_slug_or_name("BSC").unwrap().chain_id,
            ChainId::Evm(56)
        );
        assert_eq!(
            registry
                .describe_by_slug_or_name("binance smart chain")
                .unwrap()
                .chain_id,
            ChainId::Evm(56)
        );
        assert_eq!(
            registry.describe_by_slug_or_name("tron").unwrap().chain_id,
            ChainId::tron()
        );
        assert!(registry.describe_by_slug_or_name("avalanche").is_none());
    }

    #[test]
    fn test_provider_policy() {
        let registry = NetworkRegistry::builtin();
        let eth = ChainId::Evm(1);
        let bsc = ChainId::Evm(56);

        assert!(registry.is_supported_by(&eth, ProviderKind::InjectedEvm));
        assert!(registry.is_supported_by(&eth, ProviderKind::WalletConnect));
        assert!(!registry.is_supported_by(&eth, ProviderKind::ExchangeWallet));
        assert!(registry.is_supported_by(&bsc, ProviderKind::ExchangeWallet));
        assert!(!registry.is_supported_by(&ChainId::tron(), ProviderKind::InjectedEvm));
        assert!(registry.is_supported_by(&ChainId::solana(), ProviderKind::SolanaExtension));
        assert!(!registry.is_supported_by(&ChainId::Evm(999), ProviderKind::InjectedEvm));

        let exchange: Vec<_> = registry
            .supported_by(ProviderKind::ExchangeWallet)
            .map(|c| c.slug.as_str())
            .collect();
        assert_eq!(exchange, ["bsc", "bsc-testnet"]);
    }

    #[test]
    fn test_is_supported_by_is_order_independent() {
        let registry = NetworkRegistry::builtin();
        let probes = [
            (ChainId::Evm(56), ProviderKind::ExchangeWallet),
            (ChainId::Evm(1), ProviderKind::TronExtension),
            (ChainId::tron(), ProviderKind::TronExtension),
        ];
        let first: Vec<bool> = probes
            .iter()
            .map(|(id, kind)| registry.is_supported_by(id, *kind))
            .collect();
        let reversed: Vec<bool> = probes
            .iter()
            .rev()
            .map(|(id, kind)| registry.is_supported_by(id, *kind))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        assert_eq!(first, reversed);
        assert_eq!(first, [true, false, true]);
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let mut chains = builtin_chains();
        let mut dup = chains[0].clone();
        dup.slug = "eth-copy".into();
        chains.push(dup);
        assert!(matches!(
            NetworkRegistry::new(chains),
            Err(RegistryError::DuplicateChainId(_))
        ));

        let mut chains = builtin_chains();
        let mut dup = chains[0].clone();
        dup.chain_id = ChainId::Evm(777);
        chains.push(dup);
        assert!(matches!(
            NetworkRegistry::new(chains),
            Err(RegistryError::DuplicateSlug(_))
        ));
    }

    #[test]
    fn test_add_chain_params() {
        let registry = NetworkRegistry::builtin();
        let polygon = registry.describe_by_slug_or_name("polygon").unwrap();
        let params = polygon.add_chain_params().unwrap();
        assert_eq!(params["chainId"], "0x89");
        assert_eq!(params["nativeCurrency"]["symbol"], "MATIC");
        assert_eq!(params["rpcUrls"][0], "https://polygon-rpc.com/");

        let tron = registry.describe(&ChainId::tron()).unwrap();
        assert!(tron.add_chain_params().is_none());
        assert_eq!(tron.sole_provider(), Some(ProviderKind::TronExtension));
    }
}
