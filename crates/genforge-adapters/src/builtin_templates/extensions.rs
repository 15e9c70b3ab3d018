//! Extension and tooling templates: Chrome, VS Code, CLI, Shopify, Discord.

use serde_json::json;

use genforge_core::domain::{
    DomainError, GenerationContext, GenerationTemplate, TemplateCommand, TemplateDependency,
    TemplateFile, TemplateId, ValidationRule,
};

use super::pretty;
use crate::builtin_constraints;

/// Fill `{{projectName}}` and `{{slug}}` (the package-safe name).
///
/// Used where a file needs both forms, which plain interpolation cannot give.
fn fill(text: &str, ctx: &GenerationContext) -> String {
    text.replace("{{slug}}", &ctx.package_name())
        .replace("{{projectName}}", ctx.project_name())
}

// ============================================================================
// Chrome extension
// ============================================================================

pub fn chrome_extension() -> Result<GenerationTemplate, DomainError> {
    GenerationTemplate::builder()
        .id(TemplateId::new("chrome-extension-v3")?)
        .name("Chrome Extension (Manifest V3)")
        .description("Modern Chrome extension with TypeScript and React")
        .constraints(builtin_constraints::chrome_extension()?)
        .file(TemplateFile::generated("manifest.json", chrome_manifest))
        .file(TemplateFile::parameterized("src/popup/popup.tsx", CHROME_POPUP))
        .file(TemplateFile::parameterized("src/popup/popup.html", CHROME_POPUP_HTML))
        .file(TemplateFile::parameterized(
            "src/background/background.ts",
            CHROME_BACKGROUND,
        ))
        .file(TemplateFile::parameterized("src/content/content.ts", CHROME_CONTENT))
        .file(TemplateFile::generated("package.json", chrome_package_json))
        .file(TemplateFile::literal("vite.config.ts", CHROME_VITE_CONFIG))
        .file(TemplateFile::generated("tsconfig.json", chrome_tsconfig))
        .command(TemplateCommand::new("npm init -y", "Initialize package.json"))
        .command(TemplateCommand::new(
            "npm install react react-dom @types/react @types/react-dom",
            "Install React dependencies",
        ))
        .command(TemplateCommand::new(
            "npm install -D vite @vitejs/plugin-react typescript @types/chrome",
            "Install build tools",
        ))
        .command(TemplateCommand::new("npm run build", "Build extension"))
        .dependencies([
            TemplateDependency::runtime("react", "^18.0.0"),
            TemplateDependency::runtime("react-dom", "^18.0.0"),
            TemplateDependency::dev("@types/react", "^18.0.0"),
            TemplateDependency::dev("@types/react-dom", "^18.0.0"),
            TemplateDependency::dev("vite", "^5.0.0"),
            TemplateDependency::dev("@vitejs/plugin-react", "^4.0.0"),
            TemplateDependency::dev("typescript", "^5.0.0"),
            TemplateDependency::dev("@types/chrome", "^0.0.270"),
        ])
        .rule(ValidationRule::file_exists(
            "Extension files exist",
            ["manifest.json", "src/popup/popup.tsx"],
        ))
        .rule(ValidationRule::command_success(
            "Extension builds successfully",
            "npm run build",
        ))
        .build()
}

fn chrome_manifest(ctx: &GenerationContext) -> String {
    pretty(json!({
        "manifest_version": 3,
        "name": ctx.project_name(),
        "version": "1.0.0",
        "description": format!("{} Chrome Extension", ctx.project_name()),
        "permissions": ["storage", "activeTab"],
        "action": {
            "default_popup": "popup.html",
            "default_title": ctx.project_name()
        },
        "background": { "service_worker": "background.js" },
        "content_scripts": [
            { "matches": ["<all_urls>"], "js": ["content.js"] }
        ]
    }))
}

fn chrome_package_json(ctx: &GenerationContext) -> String {
    pretty(json!({
        "name": ctx.package_name(),
        "version": "1.0.0",
        "description": format!("{} Chrome Extension", ctx.project_name()),
        "scripts": {
            "build": "vite build",
            "dev": "vite build --watch"
        }
    }))
}

fn chrome_tsconfig(_: &GenerationContext) -> String {
    pretty(json!({
        "compilerOptions": {
            "target": "ES2020",
            "lib": ["ES2020", "DOM"],
            "module": "ESNext",
            "moduleResolution": "node",
            "strict": true,
            "jsx": "react-jsx",
            "types": ["chrome"]
        },
        "include": ["src/**/*"]
    }))
}

const CHROME_POPUP: &str = r#"import React from 'react'
import { createRoot } from 'react-dom/client'

function Popup() {
  return (
    <div style={{ width: '300px', padding: '20px' }}>
      <h1>{{projectName}}</h1>
      <p>Welcome to your Chrome extension!</p>
      <button onClick={() => chrome.tabs.query({ active: true }, (tabs) => {
        console.log('Current tab:', tabs[0])
      })}>
        Get Current Tab
      </button>
    </div>
  )
}

const container = document.getElementById('root')
const root = createRoot(container!)
root.render(<Popup />)
"#;

const CHROME_POPUP_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{projectName}}</title>
</head>
<body>
  <div id="root"></div>
  <script src="popup.js"></script>
</body>
</html>
"#;

const CHROME_BACKGROUND: &str = r#"chrome.runtime.onInstalled.addListener(() => {
  console.log('{{projectName}} extension installed')
})

chrome.action.onClicked.addListener((tab) => {
  console.log('Extension clicked on tab:', tab.id)
})
"#;

const CHROME_CONTENT: &str = r#"console.log('{{projectName}} content script loaded')

document.addEventListener('DOMContentLoaded', () => {
  console.log('Page loaded, extension active')
})
"#;

const CHROME_VITE_CONFIG: &str = r#"import { defineConfig } from 'vite'
import react from '@vitejs/plugin-react'

export default defineConfig({
  plugins: [react()],
  build: {
    rollupOptions: {
      input: {
        popup: 'src/popup/popup.tsx',
        background: 'src/background/background.ts',
        content: 'src/content/content.ts'
      },
      output: {
        entryFileNames: '[name].js',
        chunkFileNames: '[name].js',
        assetFileNames: '[name].[ext]'
      }
    }
  }
})
"#;

// ============================================================================
// VS Code extension
// ============================================================================

pub fn vscode_extension() -> Result<GenerationTemplate, DomainError> {
    GenerationTemplate::builder()
        .id(TemplateId::new("vscode-extension-typescript")?)
        .name("VS Code Extension (TypeScript)")
        .description("VS Code extension with TypeScript and comprehensive features")
        .constraints(builtin_constraints::vscode_extension()?)
        .file(TemplateFile::generated("package.json", vscode_package_json))
        .file(TemplateFile::generated("src/extension.ts", |ctx| {
            fill(VSCODE_EXTENSION, ctx)
        }))
        .file(TemplateFile::generated("src/commands.ts", |ctx| {
            fill(VSCODE_COMMANDS, ctx)
        }))
        .file(TemplateFile::generated("tsconfig.json", vscode_tsconfig))
        .file(TemplateFile::generated(".vscode/launch.json", vscode_launch))
        .file(TemplateFile::generated("README.md", |ctx| fill(VSCODE_README, ctx)))
        .command(TemplateCommand::new("npm init -y", "Initialize package.json"))
        .command(TemplateCommand::new(
            "npm install -D @types/vscode typescript @vscode/test-cli",
            "Install VS Code dependencies",
        ))
        .command(TemplateCommand::new("npm run compile", "Compile TypeScript"))
        .dependencies([
            TemplateDependency::dev("@types/vscode", "^1.80.0"),
            TemplateDependency::dev("typescript", "^5.0.0"),
            TemplateDependency::dev("@vscode/test-cli", "^0.0.4"),
        ])
        .rule(ValidationRule::file_exists(
            "Extension files exist",
            ["package.json", "src/extension.ts"],
        ))
        .rule(ValidationRule::command_success(
            "Extension compiles successfully",
            "npm run compile",
        ))
        .build()
}

fn vscode_package_json(ctx: &GenerationContext) -> String {
    let slug = ctx.package_name();
    pretty(json!({
        "name": slug,
        "displayName": ctx.project_name(),
        "description": format!("{} VS Code Extension", ctx.project_name()),
        "version": "0.0.1",
        "engines": { "vscode": "^1.80.0" },
        "categories": ["Other"],
        "activationEvents": [],
        "main": "./out/extension.js",
        "contributes": {
            "commands": [
                { "command": format!("{slug}.hello"), "title": "Hello World" }
            ]
        },
        "scripts": {
            "compile": "tsc -p ./",
            "watch": "tsc -watch -p ./"
        }
    }))
}

fn vscode_tsconfig(_: &GenerationContext) -> String {
    pretty(json!({
        "compilerOptions": {
            "module": "commonjs",
            "target": "ES2020",
            "outDir": "out",
            "lib": ["ES2020"],
            "sourceMap": true,
            "rootDir": "src",
            "strict": true
        },
        "exclude": ["node_modules", ".vscode-test"]
    }))
}

fn vscode_launch(_: &GenerationContext) -> String {
    pretty(json!({
        "version": "0.2.0",
        "configurations": [
            {
                "name": "Extension",
                "type": "extensionHost",
                "request": "launch",
                "args": ["--extensionDevelopmentPath=${workspaceFolder}"],
                "outFiles": ["${workspaceFolder}/out/**/*.js"],
                "preLaunchTask": "npm: compile"
            }
        ]
    }))
}

const VSCODE_EXTENSION: &str = r#"import * as vscode from 'vscode'

export function activate(context: vscode.ExtensionContext) {
  console.log('{{projectName}} extension is now active!')

  const disposable = vscode.commands.registerCommand('{{slug}}.hello', () => {
    vscode.window.showInformationMessage('Hello World from {{projectName}}!')
  })

  context.subscriptions.push(disposable)
}

export function deactivate() {
  console.log('{{projectName}} extension deactivated')
}
"#;

const VSCODE_COMMANDS: &str = r#"import * as vscode from 'vscode'

export function registerCommands(context: vscode.ExtensionContext) {
  const commands = [
    vscode.commands.registerCommand('{{slug}}.hello', () => {
      vscode.window.showInformationMessage('Hello from {{projectName}}!')
    })
  ]

  commands.forEach(command => context.subscriptions.push(command))
}
"#;

const VSCODE_README: &str = r#"# {{projectName}}

{{projectName}} VS Code Extension

## Features

- Hello World command

## Requirements

- VS Code 1.80.0 or higher

## Extension Settings

This extension contributes the following settings:

* `{{slug}}.enable`: Enable/disable this extension.

## Release Notes

### 1.0.0

Initial release of {{projectName}}
"#;

// ============================================================================
// CLI tool
// ============================================================================

pub fn cli_tool() -> Result<GenerationTemplate, DomainError> {
    GenerationTemplate::builder()
        .id(TemplateId::new("cli-tool-commander")?)
        .name("CLI Tool (Commander.js)")
        .description("Command-line tool with TypeScript and Commander.js")
        .constraints(builtin_constraints::cli_tool()?)
        .file(TemplateFile::generated("src/index.ts", |ctx| fill(CLI_INDEX, ctx)).executable())
        .file(TemplateFile::parameterized("src/commands/hello.ts", CLI_HELLO))
        .file(TemplateFile::generated("package.json", cli_package_json))
        .file(TemplateFile::generated("tsconfig.json", cli_tsconfig))
        .file(TemplateFile::generated("README.md", |ctx| fill(CLI_README, ctx)))
        .command(TemplateCommand::new("npm init -y", "Initialize package.json"))
        .command(TemplateCommand::new(
            "npm install commander chalk inquirer",
            "Install CLI dependencies",
        ))
        .command(TemplateCommand::new(
            "npm install -D typescript @types/node ts-node",
            "Install development dependencies",
        ))
        .command(TemplateCommand::new("npm run build", "Build CLI tool"))
        .dependencies([
            TemplateDependency::runtime("commander", "^11.0.0"),
            TemplateDependency::runtime("chalk", "^5.0.0"),
            TemplateDependency::runtime("inquirer", "^9.0.0"),
            TemplateDependency::dev("typescript", "^5.0.0"),
            TemplateDependency::dev("@types/node", "^20.0.0"),
            TemplateDependency::dev("ts-node", "^10.0.0"),
        ])
        .rule(ValidationRule::file_exists(
            "CLI files exist",
            ["src/index.ts", "package.json"],
        ))
        .rule(ValidationRule::command_success(
            "CLI builds successfully",
            "npm run build",
        ))
        .build()
}

fn cli_package_json(ctx: &GenerationContext) -> String {
    let slug = ctx.package_name();
    let mut bin = serde_json::Map::new();
    bin.insert(slug.clone(), json!("./dist/index.js"));

    pretty(json!({
        "name": slug,
        "version": "1.0.0",
        "description": format!("{} CLI Tool", ctx.project_name()),
        "main": "dist/index.js",
        "bin": bin,
        "scripts": {
            "build": "tsc",
            "start": "node dist/index.js",
            "dev": "ts-node src/index.ts"
        }
    }))
}

fn cli_tsconfig(_: &GenerationContext) -> String {
    pretty(json!({
        "compilerOptions": {
            "target": "ES2020",
            "module": "commonjs",
            "outDir": "./dist",
            "rootDir": "./src",
            "strict": true,
            "esModuleInterop": true,
            "skipLibCheck": true,
            "forceConsistentCasingInFileNames": true
        },
        "include": ["src/**/*"],
        "exclude": ["node_modules", "dist"]
    }))
}

const CLI_INDEX: &str = r#"#!/usr/bin/env node

import { Command } from 'commander'
import { helloCommand } from './commands/hello'

const program = new Command()

program
  .name('{{slug}}')
  .description('{{projectName}} CLI Tool')
  .version('1.0.0')

program
  .command('hello')
  .description('Say hello')
  .option('-n, --name <name>', 'name to greet', 'World')
  .action(helloCommand)

program.parse()
"#;

const CLI_HELLO: &str = r#"import chalk from 'chalk'

export async function helloCommand(options: { name: string }) {
  console.log(chalk.green(`Hello ${options.name} from {{projectName}}!`))
}
"#;

const CLI_README: &str = r#"# {{projectName}}

A CLI tool built with TypeScript and Commander.js

## Installation

```bash
npm install -g {{slug}}
```

## Usage

```bash
{{slug}} hello --name "Your Name"
```

## Commands

- `hello`: Say hello to someone

## Development

```bash
npm install
npm run dev
```

## Build

```bash
npm run build
```
"#;

// ============================================================================
// Shopify app
// ============================================================================

pub fn shopify_app() -> Result<GenerationTemplate, DomainError> {
    GenerationTemplate::builder()
        .id(TemplateId::new("shopify-app-remix")?)
        .name("Shopify App (Remix)")
        .description("Shopify app with Remix, Polaris, and GraphQL")
        .constraints(builtin_constraints::shopify_app()?)
        .file(TemplateFile::literal("app/root.tsx", SHOPIFY_ROOT))
        .file(TemplateFile::parameterized("app/routes/_index.tsx", SHOPIFY_INDEX))
        .file(TemplateFile::literal("app/shopify.server.ts", SHOPIFY_SERVER))
        .file(TemplateFile::generated("package.json", shopify_package_json))
        .file(TemplateFile::parameterized("shopify.app.toml", SHOPIFY_CONFIG))
        .command(TemplateCommand::new(
            "npm create @shopify/app@latest",
            "Create Shopify app",
        ))
        .command(TemplateCommand::new("npm install", "Install dependencies"))
        .command(TemplateCommand::new("npm run dev", "Start development server"))
        .dependencies([
            TemplateDependency::runtime("@shopify/shopify-app-remix", "^2.0.0"),
            TemplateDependency::runtime("@shopify/polaris", "^12.0.0"),
            TemplateDependency::runtime("@remix-run/node", "^2.0.0"),
            TemplateDependency::runtime("@remix-run/react", "^2.0.0"),
            TemplateDependency::runtime("react", "^18.0.0"),
            TemplateDependency::runtime("react-dom", "^18.0.0"),
        ])
        .rule(ValidationRule::file_exists(
            "Shopify app files exist",
            ["app/root.tsx", "shopify.app.toml"],
        ))
        .build()
}

fn shopify_package_json(ctx: &GenerationContext) -> String {
    pretty(json!({
        "name": ctx.package_name(),
        "private": true,
        "sideEffects": false,
        "version": "1.0.0",
        "scripts": {
            "build": "remix build",
            "dev": "shopify app dev",
            "start": "remix-serve build"
        }
    }))
}

const SHOPIFY_ROOT: &str = r#"import { Links, LiveReload, Meta, Outlet, Scripts, ScrollRestoration } from "@remix-run/react"

export default function App() {
  return (
    <html>
      <head>
        <meta charSet="utf-8" />
        <meta name="viewport" content="width=device-width,initial-scale=1" />
        <Meta />
        <Links />
      </head>
      <body>
        <Outlet />
        <ScrollRestoration />
        <Scripts />
        <LiveReload />
      </body>
    </html>
  )
}
"#;

const SHOPIFY_INDEX: &str = r#"import { Page, Layout, Card, Button } from "@shopify/polaris"

export default function Index() {
  return (
    <Page title="{{projectName}}">
      <Layout>
        <Layout.Section>
          <Card>
            <p>Welcome to your Shopify app!</p>
            <Button primary>Get Started</Button>
          </Card>
        </Layout.Section>
      </Layout>
    </Page>
  )
}
"#;

const SHOPIFY_SERVER: &str = r#"import { shopifyApp } from "@shopify/shopify-app-remix/server"
import { restResources } from "@shopify/shopify-api/rest/admin/2023-10"

const shopify = shopifyApp({
  apiKey: process.env.SHOPIFY_API_KEY!,
  apiSecretKey: process.env.SHOPIFY_API_SECRET!,
  scopes: ["read_products"],
  appUrl: process.env.SHOPIFY_APP_URL!,
  restResources,
})

export default shopify
export const authenticate = shopify.authenticate
"#;

const SHOPIFY_CONFIG: &str = r#"# https://shopify.dev/docs/apps/tools/cli/configuration

name = "{{projectName}}"
client_id = "YOUR_CLIENT_ID"
application_url = "https://localhost:3000"
embedded = true

[access_scopes]
scopes = "read_products"

[auth]
redirect_urls = [
  "https://localhost:3000/auth/callback",
  "https://localhost:3000/auth/shopify/callback",
]

[webhooks]
api_version = "2023-10"

[pos]
embedded = false
"#;

// ============================================================================
// Discord bot
// ============================================================================

pub fn discord_bot() -> Result<GenerationTemplate, DomainError> {
    GenerationTemplate::builder()
        .id(TemplateId::new("discord-bot-typescript")?)
        .name("Discord Bot (TypeScript)")
        .description("Discord bot with slash commands and event handling")
        .constraints(builtin_constraints::discord_bot()?)
        .file(TemplateFile::literal("src/index.ts", DISCORD_INDEX))
        .file(TemplateFile::literal("src/commands/ping.ts", DISCORD_PING))
        .file(TemplateFile::literal("src/events/ready.ts", DISCORD_READY))
        .file(TemplateFile::generated("package.json", discord_package_json))
        .file(TemplateFile::literal(".env.example", DISCORD_ENV).no_overwrite())
        .command(TemplateCommand::new("npm init -y", "Initialize package.json"))
        .command(TemplateCommand::new(
            "npm install discord.js dotenv",
            "Install Discord.js",
        ))
        .command(TemplateCommand::new(
            "npm install -D typescript @types/node ts-node",
            "Install development dependencies",
        ))
        .dependencies([
            TemplateDependency::runtime("discord.js", "^14.0.0"),
            TemplateDependency::runtime("dotenv", "^16.0.0"),
            TemplateDependency::dev("typescript", "^5.0.0"),
            TemplateDependency::dev("@types/node", "^20.0.0"),
            TemplateDependency::dev("ts-node", "^10.0.0"),
        ])
        .rule(ValidationRule::file_exists(
            "Discord bot files exist",
            ["src/index.ts", "package.json"],
        ))
        .build()
}

fn discord_package_json(ctx: &GenerationContext) -> String {
    pretty(json!({
        "name": ctx.package_name(),
        "version": "1.0.0",
        "description": format!("{} Discord Bot", ctx.project_name()),
        "main": "dist/index.js",
        "scripts": {
            "build": "tsc",
            "start": "node dist/index.js",
            "dev": "ts-node src/index.ts"
        }
    }))
}

const DISCORD_INDEX: &str = r#"import { Client, GatewayIntentBits, Collection } from 'discord.js'
import dotenv from 'dotenv'
import { pingCommand } from './commands/ping'

dotenv.config()

const client = new Client({
  intents: [GatewayIntentBits.Guilds, GatewayIntentBits.GuildMessages]
})

client.commands = new Collection()
client.commands.set('ping', pingCommand)

client.once('ready', () => {
  console.log(`${client.user?.tag} is online!`)
})

client.on('interactionCreate', async (interaction) => {
  if (!interaction.isChatInputCommand()) return

  const command = client.commands.get(interaction.commandName)
  if (!command) return

  try {
    await command.execute(interaction)
  } catch (error) {
    console.error(error)
    await interaction.reply({ content: 'There was an error!', ephemeral: true })
  }
})

client.login(process.env.DISCORD_TOKEN)
"#;

const DISCORD_PING: &str = r#"import { ChatInputCommandInteraction, SlashCommandBuilder } from 'discord.js'

export const pingCommand = {
  data: new SlashCommandBuilder()
    .setName('ping')
    .setDescription('Replies with Pong!'),

  async execute(interaction: ChatInputCommandInteraction) {
    await interaction.reply('Pong!')
  }
}
"#;

const DISCORD_READY: &str = r#"import { Client } from 'discord.js'

export function readyEvent(client: Client) {
  client.once('ready', () => {
    console.log(`${client.user?.tag} is ready!`)
  })
}
"#;

const DISCORD_ENV: &str = "DISCORD_TOKEN=your_bot_token_here
CLIENT_ID=your_client_id_here
GUILD_ID=your_guild_id_here
";

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(template: GenerationTemplate, name: &str) -> GenerationContext {
        GenerationContext::new(name, "/tmp/out", template.constraints.clone(), template)
    }

    #[test]
    fn vscode_command_ids_use_the_slug() {
        let t = vscode_extension().unwrap();
        let c = ctx(t.clone(), "Code Buddy");
        let ext = t
            .files
            .iter()
            .find(|f| f.path.to_string() == "src/extension.ts")
            .unwrap()
            .content
            .resolve(&c);
        assert!(ext.contains("'code-buddy.hello'"));
        assert!(ext.contains("Hello World from Code Buddy!"));
    }

    #[test]
    fn cli_entry_point_is_executable() {
        let t = cli_tool().unwrap();
        let index = t
            .files
            .iter()
            .find(|f| f.path.to_string() == "src/index.ts")
            .unwrap();
        assert!(index.executable);
    }

    #[test]
    fn discord_env_example_is_never_overwritten() {
        let t = discord_bot().unwrap();
        let env = t.files.iter().find(|f| f.path.to_string() == ".env.example").unwrap();
        assert!(!env.overwrite);
    }
}
