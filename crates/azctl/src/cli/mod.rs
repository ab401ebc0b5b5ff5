//! CLI structure and command definitions
//!
//! Defines the command-line interface using clap. Commands are grouped by
//! resource: accounts on the management plane, pools/jobs/tasks/schedules on
//! the Batch service, vaults on the management plane, keys and secrets on
//! the vault data plane.

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// Azure Batch and Key Vault management CLI
#[derive(Parser, Debug)]
#[command(name = "azctl")]
#[command(version, about = "Manage Azure Batch accounts, pools, jobs, and Key Vault")]
#[command(long_about = "
Manage Azure Batch accounts, pools, jobs, and Key Vault

Profiles hold the subscription and service principal to use:
    azctl profile set prod --subscription-id ... --tenant-id ... \\
        --client-id ... --client-secret ...

EXAMPLES:
    # Create a Batch account with paired auto-storage
    azctl account create --resource-group rg --region westus \\
        --name myacct --storage mystorage

    # Create a pool and wait for its nodes to allocate
    azctl pool create render --vm-size STANDARD_D1_V2 --nodes 4 \\
        --image-publisher canonical --image-offer ubuntu-24_04-lts \\
        --image-sku server --node-agent 'batch.node.ubuntu 24.04' --wait

    # Encrypt text with a vault key
    azctl key encrypt --vault-url https://kv.vault.azure.net app-key 'hello'

    # Get JSON output for scripting
    azctl pool list -o json

For more help on a specific command, run:
    azctl <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "AZCTL_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "AZCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "json")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage Batch accounts (management plane)
    #[command(subcommand)]
    Account(AccountCommands),

    /// Manage pools on the Batch service
    #[command(subcommand)]
    Pool(PoolCommands),

    /// Manage jobs on the Batch service
    #[command(subcommand)]
    Job(JobCommands),

    /// Manage tasks within jobs
    #[command(subcommand)]
    Task(TaskCommands),

    /// Manage job schedules
    #[command(subcommand)]
    Schedule(ScheduleCommands),

    /// Manage Key Vault vaults (management plane)
    #[command(subcommand)]
    Vault(VaultCommands),

    /// Manage keys in a vault
    #[command(subcommand)]
    Key(KeyCommands),

    /// Manage secrets in a vault
    #[command(subcommand)]
    Secret(SecretCommands),

    /// Manage configuration profiles
    #[command(subcommand)]
    Profile(ProfileCommands),
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Create a Batch account with paired auto-storage or an application
    Create {
        /// Account name
        name: String,
        #[arg(long, short = 'g')]
        resource_group: String,
        /// Region to place the account in
        #[arg(long)]
        region: String,
        /// Name of the storage account to create alongside
        #[arg(long, required_unless_present = "application", conflicts_with = "application")]
        storage: Option<String>,
        /// Application id to register instead of auto-storage
        #[arg(long)]
        application: Option<String>,
        /// Display name for the registered application
        #[arg(long, requires = "application")]
        display_name: Option<String>,
        /// Allow application package updates after creation
        #[arg(long, requires = "application")]
        allow_updates: bool,
        /// Also allocate an application package slot at this version
        #[arg(long, requires = "application")]
        package_version: Option<String>,
    },
    /// Show a Batch account
    Show {
        name: String,
        #[arg(long, short = 'g')]
        resource_group: String,
    },
    /// List Batch accounts
    List {
        /// Limit to one resource group; omit for the whole subscription
        #[arg(long, short = 'g')]
        resource_group: Option<String>,
    },
    /// Delete a Batch account
    Delete {
        name: String,
        #[arg(long, short = 'g')]
        resource_group: String,
        /// Also delete this paired storage account
        #[arg(long)]
        storage: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show the account access keys
    Keys {
        name: String,
        #[arg(long, short = 'g')]
        resource_group: String,
    },
    /// Regenerate one of the account access keys
    RegenerateKey {
        name: String,
        #[arg(long, short = 'g')]
        resource_group: String,
        /// Which key to regenerate
        #[arg(long, value_enum)]
        key: KeyKind,
    },
    /// Show the Batch account quota for a region
    Quota {
        /// Region to query
        region: String,
    },
    /// Register an application under an existing account
    AppCreate {
        /// Application id
        application: String,
        #[arg(long)]
        account: String,
        #[arg(long, short = 'g')]
        resource_group: String,
        #[arg(long)]
        display_name: Option<String>,
        /// Allow package updates after creation
        #[arg(long)]
        allow_updates: bool,
        /// Also allocate a package slot at this version
        #[arg(long)]
        package_version: Option<String>,
    },
    /// Remove an application registration from an account
    AppDelete {
        /// Application id
        application: String,
        #[arg(long)]
        account: String,
        #[arg(long, short = 'g')]
        resource_group: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KeyKind {
    Primary,
    Secondary,
}

#[derive(Subcommand, Debug)]
pub enum PoolCommands {
    /// Create a pool
    Create {
        /// Pool id
        id: String,
        #[arg(long)]
        vm_size: String,
        /// Target dedicated node count
        #[arg(long, default_value_t = 1)]
        nodes: i32,
        /// OS family for a cloud service pool (exclusive with image flags)
        #[arg(long, conflicts_with_all = ["image_publisher", "image_offer", "image_sku", "node_agent"])]
        os_family: Option<String>,
        /// Marketplace image publisher for a virtual machine pool
        #[arg(long, requires = "image_offer")]
        image_publisher: Option<String>,
        #[arg(long, requires = "image_sku")]
        image_offer: Option<String>,
        #[arg(long, requires = "node_agent")]
        image_sku: Option<String>,
        /// Node agent SKU id matching the image
        #[arg(long, requires = "image_publisher")]
        node_agent: Option<String>,
        /// Wait for allocation to reach the steady state
        #[arg(long)]
        wait: bool,
        /// Poll budget in seconds when waiting
        #[arg(long, default_value_t = 300)]
        timeout: u64,
        /// Seconds between polls when waiting
        #[arg(long, default_value_t = 30)]
        interval: u64,
    },
    /// Show a pool (case-insensitive lookup)
    Show { id: String },
    /// List pools
    List,
    /// Resize a pool to a new dedicated node count
    Resize {
        id: String,
        #[arg(long)]
        nodes: i32,
    },
    /// Delete a pool
    Delete {
        id: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Wait for a pool to reach the steady state
    Wait {
        id: String,
        /// Poll budget in seconds
        #[arg(long, default_value_t = 300)]
        timeout: u64,
        /// Seconds between polls
        #[arg(long, default_value_t = 30)]
        interval: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// Create a job bound to a pool
    Create {
        id: String,
        #[arg(long)]
        pool: String,
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Show a job
    Show { id: String },
    /// List jobs
    List,
    /// Delete a job and its tasks
    Delete {
        id: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task to a job
    Add {
        /// Task id
        id: String,
        #[arg(long)]
        job: String,
        /// Command line the task runs
        #[arg(long)]
        command: String,
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Show a task
    Show {
        id: String,
        #[arg(long)]
        job: String,
    },
    /// List tasks in a job
    List {
        #[arg(long)]
        job: String,
    },
    /// Delete a task
    Delete {
        id: String,
        #[arg(long)]
        job: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScheduleCommands {
    /// Create a job schedule with a recurring interval
    Create {
        /// Schedule id
        id: String,
        #[arg(long)]
        pool: String,
        /// Recurrence hours component
        #[arg(long, default_value_t = 0)]
        hours: u32,
        /// Recurrence minutes component
        #[arg(long, default_value_t = 0)]
        minutes: u32,
        /// Recurrence seconds component
        #[arg(long, default_value_t = 0)]
        seconds: u32,
        /// Command line for the job manager task launched each recurrence
        #[arg(long)]
        command: Option<String>,
    },
    /// Show a job schedule
    Show { id: String },
    /// List job schedules
    List,
    /// Delete a job schedule
    Delete {
        id: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum VaultCommands {
    /// Create a vault granting a principal key access
    Create {
        /// Vault name
        name: String,
        #[arg(long, short = 'g')]
        resource_group: String,
        /// Region to place the vault in
        #[arg(long)]
        region: String,
        /// Object id of the principal to authorize
        #[arg(long)]
        object_id: String,
    },
    /// Show a vault
    Show {
        name: String,
        #[arg(long, short = 'g')]
        resource_group: String,
    },
    /// List vaults in a resource group
    List {
        #[arg(long, short = 'g')]
        resource_group: String,
    },
    /// Delete a vault
    Delete {
        name: String,
        #[arg(long, short = 'g')]
        resource_group: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Grant a principal full key access plus secret read rights
    Authorize {
        name: String,
        #[arg(long, short = 'g')]
        resource_group: String,
        /// Object id of the principal to authorize
        #[arg(long)]
        object_id: String,
    },
    /// Widen a principal's secret permissions to the full set
    BroadenSecrets {
        name: String,
        #[arg(long, short = 'g')]
        resource_group: String,
        /// Object id of the principal whose policy to widen
        #[arg(long)]
        object_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum KeyCommands {
    /// Create an RSA key in a vault
    Create {
        /// Key name
        name: String,
        /// Vault URL, e.g. https://kv.vault.azure.net
        #[arg(long)]
        vault_url: String,
        /// RSA modulus size in bits
        #[arg(long, default_value_t = 2048)]
        size: u32,
    },
    /// Show the newest version of a key
    Show {
        name: String,
        #[arg(long)]
        vault_url: String,
    },
    /// List keys in a vault
    List {
        #[arg(long)]
        vault_url: String,
    },
    /// Set or clear the expiry time on a key
    UpdateExpiry {
        name: String,
        #[arg(long)]
        vault_url: String,
        /// Expiry time, seconds since the epoch
        #[arg(long)]
        expires: i64,
    },
    /// Delete a key and all of its versions
    Delete {
        name: String,
        #[arg(long)]
        vault_url: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Encrypt text with a vault key (RSA-OAEP), printing base64 ciphertext
    Encrypt {
        /// Key name
        name: String,
        /// Text to encrypt
        text: String,
        #[arg(long)]
        vault_url: String,
    },
    /// Decrypt base64 ciphertext produced by `key encrypt`
    Decrypt {
        /// Key name
        name: String,
        /// Base64 ciphertext
        ciphertext: String,
        #[arg(long)]
        vault_url: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SecretCommands {
    /// Set a secret value
    Set {
        name: String,
        value: String,
        #[arg(long)]
        vault_url: String,
    },
    /// Show the newest version of a secret
    Show {
        name: String,
        #[arg(long)]
        vault_url: String,
    },
    /// List secrets in a vault (names only, no values)
    List {
        #[arg(long)]
        vault_url: String,
    },
    /// Set or clear the expiry time on a secret
    UpdateExpiry {
        name: String,
        #[arg(long)]
        vault_url: String,
        /// Expiry time, seconds since the epoch
        #[arg(long)]
        expires: i64,
    },
    /// Delete a secret and all of its versions
    Delete {
        name: String,
        #[arg(long)]
        vault_url: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List configured profiles
    List,
    /// Show one profile (secret redacted)
    Show { name: String },
    /// Create or update a profile
    Set {
        name: String,
        #[arg(long)]
        subscription_id: String,
        #[arg(long)]
        tenant_id: String,
        #[arg(long)]
        client_id: String,
        #[arg(long)]
        client_secret: String,
        /// Batch account endpoint for data-plane commands
        #[arg(long)]
        batch_endpoint: Option<String>,
        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },
    /// Remove a profile
    Remove { name: String },
    /// Set the default profile
    Default { name: String },
    /// Print the config file path
    Path,
}
