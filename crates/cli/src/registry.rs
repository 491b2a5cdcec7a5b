//! Static description of every command group, command and option, rendered
//! to a clap command tree.

use clap::builder::{PossibleValuesParser, StringValueParser, TypedValueParser};
use clap::{Arg, ArgAction, Command};

use crate::validators::Validator;

/// Global switch for single-line JSON output.
pub const JSON_FLAG: &str = "json";

pub const BIN_NAME: &str = "figaro-cli";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDescriptor {
    pub id: &'static str,
    pub long: &'static str,
    pub value_name: &'static str,
    pub help: &'static str,
    pub validator: Validator,
    pub choices: &'static [&'static str],
}

impl OptionDescriptor {
    const fn new(
        id: &'static str,
        value_name: &'static str,
        help: &'static str,
        validator: Validator,
    ) -> Self {
        Self {
            id,
            long: id,
            value_name,
            help,
            validator,
            choices: &[],
        }
    }

    const fn with_choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    fn to_arg(self, cardinality: Cardinality) -> Arg {
        let validator = self.validator;

        let arg = Arg::new(self.id)
            .long(self.long)
            .value_name(self.value_name)
            .help(self.help)
            .required(cardinality == Cardinality::Required)
            .allow_hyphen_values(validator.allows_leading_hyphen());

        if self.choices.is_empty() {
            arg.value_parser(
                StringValueParser::new().try_map(move |raw| validator.validate(&raw)),
            )
        } else {
            arg.value_parser(
                PossibleValuesParser::new(self.choices.iter().copied())
                    .try_map(move |raw| validator.validate(&raw)),
            )
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    pub id: &'static str,
    pub value_name: &'static str,
    pub help: &'static str,
    pub validator: Validator,
}

impl ArgumentDescriptor {
    fn to_arg(self, index: usize) -> Arg {
        let validator = self.validator;

        Arg::new(self.id)
            .index(index)
            .value_name(self.value_name)
            .help(self.help)
            .required(true)
            .allow_hyphen_values(validator.allows_leading_hyphen())
            .value_parser(StringValueParser::new().try_map(move |raw| validator.validate(&raw)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Required,
    Optional,
}

/// An option bound to one command with its cardinality there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOption {
    pub descriptor: OptionDescriptor,
    pub cardinality: Cardinality,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub about: &'static str,
    pub options: Vec<CommandOption>,
    pub arguments: Vec<ArgumentDescriptor>,
}

impl CommandDescriptor {
    #[must_use]
    pub const fn new(name: &'static str, about: &'static str) -> Self {
        Self {
            name,
            about,
            options: Vec::new(),
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn required(mut self, descriptor: OptionDescriptor) -> Self {
        self.options.push(CommandOption {
            descriptor,
            cardinality: Cardinality::Required,
        });
        self
    }

    #[must_use]
    pub fn optional(mut self, descriptor: OptionDescriptor) -> Self {
        self.options.push(CommandOption {
            descriptor,
            cardinality: Cardinality::Optional,
        });
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: ArgumentDescriptor) -> Self {
        self.arguments.push(argument);
        self
    }

    fn to_command(&self) -> Command {
        let command = self
            .options
            .iter()
            .fold(Command::new(self.name).about(self.about), |command, option| {
                command.arg(option.descriptor.to_arg(option.cardinality))
            });

        self.arguments
            .iter()
            .enumerate()
            .fold(command, |command, (position, argument)| {
                command.arg(argument.to_arg(position + 1))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDescriptor {
    pub name: &'static str,
    pub about: &'static str,
    pub commands: Vec<CommandDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    groups: Vec<GroupDescriptor>,
}

impl Registry {
    #[must_use]
    pub const fn new(groups: Vec<GroupDescriptor>) -> Self {
        Self { groups }
    }

    #[must_use]
    pub fn groups(&self) -> &[GroupDescriptor] {
        &self.groups
    }

    #[must_use]
    pub fn find(&self, group: &str, command: &str) -> Option<&CommandDescriptor> {
        self.groups
            .iter()
            .find(|g| g.name == group)?
            .commands
            .iter()
            .find(|c| c.name == command)
    }

    /// Builds the clap tree: `<group> <command> [options]` plus the global `--json`.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let root = Command::new(BIN_NAME)
            .about("Drive the figaro delivery escrow contract from the command line")
            .version(env!("CARGO_PKG_VERSION"))
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                Arg::new(JSON_FLAG)
                    .long(JSON_FLAG)
                    .help("Print results as single-line JSON")
                    .action(ArgAction::SetTrue)
                    .global(true),
            );

        self.groups.iter().fold(root, |root, group| {
            let group_command = group.commands.iter().fold(
                Command::new(group.name)
                    .about(group.about)
                    .subcommand_required(true)
                    .arg_required_else_help(true),
                |parent, command| parent.subcommand(command.to_command()),
            );
            root.subcommand(group_command)
        })
    }
}

const SECRET: OptionDescriptor = OptionDescriptor::new(
    "secret",
    "HEX",
    "Secp256k1 secret key (hex) that signs and pays for transactions",
    Validator::SecretKey,
);
const CONTRACT: OptionDescriptor = OptionDescriptor::new(
    "contract",
    "ADDRESS",
    "Escrow contract address",
    Validator::Address,
);
const CONTRACT_CODE_ID: OptionDescriptor = OptionDescriptor::new(
    "contract-code-id",
    "CODE_ID",
    "Code id of the uploaded escrow contract",
    Validator::Integer,
);
const ROUGH_LOCATION_FROM: OptionDescriptor = OptionDescriptor::new(
    "location-from",
    "LNG,LAT|LNG,LAT",
    "Area the parcel is picked up from",
    Validator::RoughLocation,
);
const ROUGH_LOCATION_TO: OptionDescriptor = OptionDescriptor::new(
    "location-to",
    "LNG,LAT|LNG,LAT",
    "Area the parcel is delivered to",
    Validator::RoughLocation,
);
const EXACT_LOCATION_FROM: OptionDescriptor = OptionDescriptor::new(
    "location-from",
    "LNG,LAT",
    "Exact pick-up point",
    Validator::ExactLocation,
);
const EXACT_LOCATION_TO: OptionDescriptor = OptionDescriptor::new(
    "location-to",
    "LNG,LAT",
    "Exact delivery point",
    Validator::ExactLocation,
);
const TOKEN: OptionDescriptor = OptionDescriptor::new(
    "token",
    "ADDRESS",
    "cw20 token contract used for deposit and payment",
    Validator::Address,
);
const CONFIRM_PUBLIC: OptionDescriptor = OptionDescriptor::new(
    "confirm-public",
    "HEX",
    "Compressed public key that verifies the delivery confirmation",
    Validator::PublicKey,
);
const CONFIRM_PRIVATE: OptionDescriptor = OptionDescriptor::new(
    "confirm-private",
    "HEX",
    "Secret key that signs the delivery confirmation",
    Validator::ConfirmationKey,
);
const DEPOSIT: OptionDescriptor = OptionDescriptor::new(
    "deposit",
    "AMOUNT",
    "Courier collateral in token minor units",
    Validator::Amount,
);
const PAYMENT: OptionDescriptor = OptionDescriptor::new(
    "payment",
    "AMOUNT",
    "Shipping payment in token minor units",
    Validator::Amount,
);
const COMMENT: OptionDescriptor = OptionDescriptor::new(
    "comment",
    "TEXT",
    "Delivery notes for the courier",
    Validator::Comment,
);
const ADDRESS: OptionDescriptor = OptionDescriptor::new(
    "address",
    "ADDRESS",
    "Account to inspect instead of the signer",
    Validator::Address,
);
const QUERY: OptionDescriptor = OptionDescriptor::new(
    "query",
    "QUERY",
    "Contract query to run",
    Validator::ContractQuery,
)
.with_choices(&figaro_contracts::ContractQuery::NAMES);
const WASM: OptionDescriptor = OptionDescriptor::new(
    "wasm",
    "PATH",
    "Compiled contract to upload, defaults to figaro.wasm in the data directory",
    Validator::Path,
);
const INITIAL_BALANCES: OptionDescriptor = OptionDescriptor::new(
    "initial-balances",
    "JSON",
    "Initial token balances",
    Validator::Text,
);
const MINTER: OptionDescriptor = OptionDescriptor::new(
    "minter",
    "ADDRESS",
    "Account allowed to mint",
    Validator::Address,
);
const DECIMALS: OptionDescriptor = OptionDescriptor::new(
    "decimals",
    "N",
    "Token decimals",
    Validator::Integer,
);
const SYMBOL: OptionDescriptor =
    OptionDescriptor::new("symbol", "SYMBOL", "Token symbol", Validator::Text);
const NAME: OptionDescriptor = OptionDescriptor::new("name", "NAME", "Token name", Validator::Text);

/// The figaro command surface.
#[must_use]
pub fn registry() -> Registry {
    Registry::new(vec![
        GroupDescriptor {
            name: "sender",
            about: "Commands for the party sending a parcel",
            commands: vec![
                CommandDescriptor::new("instantiate", "Create a delivery request")
                    .required(SECRET)
                    .required(ROUGH_LOCATION_FROM)
                    .required(ROUGH_LOCATION_TO)
                    .required(TOKEN)
                    .required(CONFIRM_PUBLIC)
                    .required(DEPOSIT)
                    .required(PAYMENT)
                    .optional(CONTRACT_CODE_ID),
                CommandDescriptor::new("make_payment", "Pay for shipping")
                    .required(CONTRACT)
                    .required(SECRET),
                CommandDescriptor::new("set_details", "Set exact locations and a comment")
                    .required(CONTRACT)
                    .required(SECRET)
                    .required(EXACT_LOCATION_FROM)
                    .required(EXACT_LOCATION_TO)
                    .required(COMMENT),
                CommandDescriptor::new("approve_parcel_issued", "Confirm the parcel was handed over")
                    .required(CONTRACT)
                    .required(SECRET),
                CommandDescriptor::new("cancel_delivery", "Cancel the delivery")
                    .required(CONTRACT)
                    .required(SECRET),
            ],
        },
        GroupDescriptor {
            name: "courier",
            about: "Commands for the party delivering a parcel",
            commands: vec![
                CommandDescriptor::new("requests_list", "List delivery requests")
                    .required(CONTRACT_CODE_ID)
                    .required(SECRET),
                CommandDescriptor::new("accept_request", "Apply for a delivery request")
                    .required(CONTRACT)
                    .required(SECRET),
                CommandDescriptor::new("make_deposit", "Deposit collateral")
                    .required(CONTRACT)
                    .required(SECRET),
                CommandDescriptor::new("confirm_delivery", "Prove the parcel was delivered")
                    .required(CONTRACT)
                    .required(SECRET)
                    .required(CONFIRM_PRIVATE),
                CommandDescriptor::new("cancel_delivery", "Withdraw from the delivery")
                    .required(CONTRACT)
                    .required(SECRET),
            ],
        },
        GroupDescriptor {
            name: "common",
            about: "Shared utilities",
            commands: vec![
                CommandDescriptor::new("mnemonic_to_hex", "Derive hex keys from a mnemonic"),
                CommandDescriptor::new("balance", "Show stake and fee balances")
                    .required(SECRET)
                    .optional(ADDRESS),
                CommandDescriptor::new("upload_contract", "Upload the escrow contract code")
                    .required(SECRET)
                    .optional(WASM),
                CommandDescriptor::new("cw20_instantiate", "Create a cw20 token")
                    .optional(CONTRACT_CODE_ID)
                    .required(SECRET)
                    .required(INITIAL_BALANCES)
                    .required(MINTER)
                    .required(DECIMALS)
                    .required(SYMBOL)
                    .required(NAME),
                CommandDescriptor::new("info", "Run a read-only contract query")
                    .required(CONTRACT)
                    .required(SECRET)
                    .required(QUERY),
            ],
        },
    ])
}
