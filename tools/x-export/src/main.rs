//! x-export - X asset export tool
//!
//! Converts raw assets (OBJ/MTL, PNG/BMP/TGA, sprite-sheet JSON) to
//! renderer-ready binary resources (.xmdl, .xtex, .xfnt, .xbnl)

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use x_export::{ModelMagic, ModelOptions, TextureOptions, bundle, font, manifest, mesh, texture};

#[derive(Parser)]
#[command(name = "x-export")]
#[command(about = "X asset export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build assets from a manifest file
    Build {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,
    },

    /// Convert one image to a paletted texture
    Texture {
        /// Input PNG/BMP/TGA file
        input: PathBuf,

        /// Output .xtex file
        output: PathBuf,

        /// Placement descriptor: `vram_x vram_y clut_x clut_y bpp`
        placement: PathBuf,

        /// Set the semitransparency bit on every non-transparent color
        #[arg(long)]
        force_stp: bool,
    },

    /// Convert one OBJ mesh (and its material library) to a model
    Model {
        /// Input OBJ file
        input: PathBuf,

        /// Output .xmdl file
        output: PathBuf,

        /// Directory holding the already-converted .xtex files
        texture_dir: PathBuf,

        /// Do not append texture resources to the model
        #[arg(long = "no-embed-textures", action = ArgAction::SetFalse)]
        embed_textures: bool,

        /// Header magic
        #[arg(long, value_enum, default_value_t = ModelMagic::Xmdl)]
        magic: ModelMagic,
    },

    /// Convert a sprite-sheet description to a font
    Font {
        /// Input JSON file
        input: PathBuf,

        /// Output .xfnt file
        output: PathBuf,
    },

    /// Pack files into an asset bundle
    Bundle {
        /// Output bundle file
        output: PathBuf,

        /// Files to pack
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Name files relative to this directory
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match &cli.command {
        Commands::Build { verbose: true, .. } => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            verbose: _,
        } => {
            tracing::info!("Building assets from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let built = manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete! {} files written", built.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Texture {
            input,
            output,
            placement,
            force_stp,
        } => {
            tracing::info!("Converting {:?} -> {:?}", input, output);
            let placement = texture::load_placement(&placement)?;
            texture::convert_image(&input, &output, &placement, TextureOptions { force_stp })?;
            tracing::info!("Done!");
        }

        Commands::Model {
            input,
            output,
            texture_dir,
            embed_textures,
            magic,
        } => {
            tracing::info!("Converting {:?} -> {:?}", input, output);
            let options = ModelOptions {
                embed_textures,
                magic,
            };
            mesh::convert_obj(&input, &output, &texture_dir, options)?;
            tracing::info!("Done!");
        }

        Commands::Font { input, output } => {
            tracing::info!("Converting {:?} -> {:?}", input, output);
            font::convert_font(&input, &output)?;
            tracing::info!("Done!");
        }

        Commands::Bundle {
            output,
            files,
            root,
        } => {
            tracing::info!("Bundling {} files -> {:?}", files.len(), output);
            bundle::make_bundle(&output, &files, root.as_deref())?;
            tracing::info!("Done!");
        }
    }

    Ok(())
}
