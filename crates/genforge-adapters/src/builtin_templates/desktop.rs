//! Electron desktop app with a React renderer.

use serde_json::json;

use genforge_core::domain::{
    DomainError, GenerationContext, GenerationTemplate, TemplateCommand, TemplateDependency,
    TemplateFile, TemplateId, ValidationRule,
};

use super::pretty;
use crate::builtin_constraints;

pub fn electron_app() -> Result<GenerationTemplate, DomainError> {
    GenerationTemplate::builder()
        .id(TemplateId::new("electron-desktop-app")?)
        .name("Electron Desktop App")
        .description("Cross-platform desktop app with Electron and React")
        .constraints(builtin_constraints::electron_desktop()?)
        .file(TemplateFile::literal("src/main/main.ts", MAIN_TS))
        .file(TemplateFile::parameterized("src/renderer/App.tsx", RENDERER))
        .file(TemplateFile::literal("src/preload/preload.ts", PRELOAD))
        .file(TemplateFile::generated("package.json", package_json))
        .command(TemplateCommand::new("npm init -y", "Initialize package.json"))
        .command(TemplateCommand::new(
            "npm install electron react react-dom",
            "Install core dependencies",
        ))
        .command(TemplateCommand::new(
            "npm install -D @types/react @types/react-dom typescript webpack",
            "Install dev dependencies",
        ))
        .dependencies([
            TemplateDependency::runtime("electron", "^28.0.0"),
            TemplateDependency::runtime("react", "^18.0.0"),
            TemplateDependency::runtime("react-dom", "^18.0.0"),
            TemplateDependency::dev("typescript", "^5.0.0"),
            TemplateDependency::dev("@types/react", "^18.0.0"),
            TemplateDependency::dev("@types/react-dom", "^18.0.0"),
        ])
        .rule(ValidationRule::file_exists(
            "Electron main process exists",
            ["src/main/main.ts"],
        ))
        .rule(ValidationRule::command_success(
            "App builds successfully",
            "npm run build",
        ))
        .build()
}

fn package_json(ctx: &GenerationContext) -> String {
    pretty(json!({
        "name": ctx.package_name(),
        "version": "1.0.0",
        "description": format!("{} desktop application", ctx.project_name()),
        "main": "dist/main/main.js",
        "scripts": {
            "start": "electron .",
            "dev": "concurrently \"npm run build:watch\" \"wait-on dist/main/main.js && electron .\"",
            "build": "tsc",
            "build:watch": "tsc --watch",
            "pack": "electron-builder",
            "dist": "npm run build && electron-builder"
        },
        "dependencies": { "electron": "^28.0.0" },
        "devDependencies": {
            "@types/node": "^20.0.0",
            "typescript": "^5.0.0",
            "electron-builder": "^24.0.0",
            "concurrently": "^8.0.0",
            "wait-on": "^7.0.0"
        }
    }))
}

/// Main process entry; shared with the Nx monorepo's desktop app.
pub(super) const MAIN_TS: &str = r#"import { app, BrowserWindow } from 'electron'
import * as path from 'path'

function createWindow() {
  const mainWindow = new BrowserWindow({
    width: 1200,
    height: 800,
    webPreferences: {
      nodeIntegration: false,
      contextIsolation: true,
      preload: path.join(__dirname, '../preload/preload.js')
    }
  })

  if (process.env.NODE_ENV === 'development') {
    mainWindow.loadURL('http://localhost:3000')
    mainWindow.webContents.openDevTools()
  } else {
    mainWindow.loadFile(path.join(__dirname, '../renderer/index.html'))
  }
}

app.whenReady().then(createWindow)

app.on('window-all-closed', () => {
  if (process.platform !== 'darwin') {
    app.quit()
  }
})

app.on('activate', () => {
  if (BrowserWindow.getAllWindows().length === 0) {
    createWindow()
  }
})
"#;

const RENDERER: &str = r#"import React from 'react'
import { createRoot } from 'react-dom/client'

function App() {
  return (
    <div style={{ padding: '20px', fontFamily: 'Arial, sans-serif' }}>
      <h1>Welcome to {{projectName}}</h1>
      <p>This is your Electron desktop application.</p>
    </div>
  )
}

const container = document.getElementById('root')
const root = createRoot(container!)
root.render(<App />)
"#;

const PRELOAD: &str = r#"import { contextBridge, ipcRenderer } from 'electron'

contextBridge.exposeInMainWorld('electronAPI', {
  getVersion: () => process.versions.electron,
})
"#;
