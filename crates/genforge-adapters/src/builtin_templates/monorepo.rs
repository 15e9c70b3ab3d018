//! Nx full-stack monorepo: web, mobile and desktop apps plus shared libraries.

use serde_json::json;

use genforge_core::domain::{
    DomainError, GenerationContext, GenerationTemplate, TemplateCommand, TemplateDependency,
    TemplateFile, TemplateId, ValidationRule,
};

use super::{desktop, mobile, pretty};
use crate::builtin_constraints;

pub fn nx_full_stack() -> Result<GenerationTemplate, DomainError> {
    GenerationTemplate::builder()
        .id(TemplateId::new("nx-monorepo-full-stack")?)
        .name("Nx Full-Stack Monorepo")
        .description("Complete Nx monorepo with web, mobile, and desktop apps")
        .constraints(builtin_constraints::nx_monorepo()?)
        .file(TemplateFile::generated("nx.json", nx_config))
        .file(TemplateFile::generated("package.json", package_json))
        .file(TemplateFile::generated("tsconfig.base.json", tsconfig_base))
        .file(TemplateFile::parameterized("apps/web/src/app/page.tsx", WEB_PAGE))
        .file(TemplateFile::parameterized("apps/mobile/App.tsx", mobile::APP_TSX))
        .file(TemplateFile::literal("apps/desktop/src/main.ts", desktop::MAIN_TS))
        .file(TemplateFile::parameterized("libs/shared-ui/src/index.ts", SHARED_UI))
        .file(TemplateFile::parameterized("libs/shared-types/src/index.ts", SHARED_TYPES))
        .file(TemplateFile::parameterized(
            "libs/shared-business-logic/src/index.ts",
            BUSINESS_LOGIC,
        ))
        .command(TemplateCommand::new(
            "npx create-nx-workspace {{projectName}} --preset=react-ts --appName=web --style=css --defaultBase=main --no-interactive",
            "Initialize Nx workspace",
        ))
        .command(TemplateCommand::new(
            "nx g @nx/expo:app mobile --no-interactive",
            "Generate Expo mobile app",
        ))
        .command(TemplateCommand::new(
            "nx g @nx/js:lib shared-ui --no-interactive",
            "Generate shared UI library",
        ))
        .command(TemplateCommand::new(
            "nx g @nx/js:lib shared-types --no-interactive",
            "Generate shared types library",
        ))
        .command(TemplateCommand::new(
            "nx g @nx/js:lib shared-business-logic --no-interactive",
            "Generate shared business logic library",
        ))
        .command(TemplateCommand::new("npm install", "Install dependencies"))
        .dependencies([
            TemplateDependency::dev("nx", "^21.0.0"),
            TemplateDependency::dev("@nx/react", "^21.0.0"),
            TemplateDependency::dev("@nx/expo", "^21.0.0"),
            TemplateDependency::dev("@nx/next", "^21.0.0"),
            TemplateDependency::runtime("react", "^18.0.0"),
            TemplateDependency::runtime("react-dom", "^18.0.0"),
            TemplateDependency::dev("typescript", "^5.0.0"),
            TemplateDependency::dev("tailwindcss", "^3.0.0"),
        ])
        .rule(ValidationRule::file_exists(
            "Nx configuration exists",
            ["nx.json", "package.json"],
        ))
        .rule(ValidationRule::command_success(
            "Project builds successfully",
            "nx build web",
        ))
        .rule(ValidationRule::lint_pass("Code passes linting", "nx lint"))
        .build()
}

fn nx_config(_: &GenerationContext) -> String {
    pretty(json!({
        "$schema": "./node_modules/nx/schemas/nx-schema.json",
        "defaultBase": "main",
        "namedInputs": {
            "default": ["{projectRoot}/**/*", "sharedGlobals"],
            "production": ["default"],
            "sharedGlobals": []
        },
        "targetDefaults": {
            "build": {
                "dependsOn": ["^build"],
                "inputs": ["production", "^production"]
            }
        },
        "generators": {
            "@nx/react": {
                "application": { "style": "css", "linter": "eslint", "bundler": "vite" },
                "component": { "style": "css" },
                "library": { "style": "css", "linter": "eslint" }
            }
        }
    }))
}

fn package_json(ctx: &GenerationContext) -> String {
    pretty(json!({
        "name": ctx.package_name(),
        "version": "1.0.0",
        "private": true,
        "scripts": {
            "build": "nx build",
            "test": "nx test",
            "lint": "nx lint",
            "serve": "nx serve",
            "dev": "nx serve web",
            "dev:mobile": "nx serve mobile",
            "dev:desktop": "nx serve desktop",
            "build:all": "nx run-many --target=build --all"
        },
        "devDependencies": {
            "nx": "^21.0.0",
            "@nx/react": "^21.0.0",
            "@nx/next": "^21.0.0",
            "@nx/expo": "^21.0.0",
            "typescript": "^5.0.0",
            "tailwindcss": "^3.0.0"
        },
        "dependencies": {
            "react": "^18.0.0",
            "react-dom": "^18.0.0"
        }
    }))
}

fn tsconfig_base(ctx: &GenerationContext) -> String {
    let scope = ctx.package_name();
    let mut paths = serde_json::Map::new();
    for lib in ["shared-ui", "shared-types", "shared-business-logic"] {
        paths.insert(
            format!("@{scope}/{lib}"),
            json!([format!("libs/{lib}/src/index.ts")]),
        );
    }

    pretty(json!({
        "compileOnSave": false,
        "compilerOptions": {
            "rootDir": ".",
            "sourceMap": true,
            "declaration": false,
            "moduleResolution": "node",
            "emitDecoratorMetadata": true,
            "experimentalDecorators": true,
            "importHelpers": true,
            "target": "es2015",
            "module": "esnext",
            "lib": ["es2020", "dom"],
            "skipLibCheck": true,
            "skipDefaultLibCheck": true,
            "baseUrl": ".",
            "paths": paths
        },
        "exclude": ["node_modules", "tmp"]
    }))
}

const WEB_PAGE: &str = r#"import React from 'react'

export default function HomePage() {
  return (
    <div className="min-h-screen bg-gradient-to-br from-blue-50 to-indigo-100">
      <div className="container mx-auto px-4 py-16">
        <div className="text-center">
          <h1 className="text-4xl font-bold text-gray-900 mb-4">
            Welcome to {{projectName}}
          </h1>
          <p className="text-xl text-gray-600 mb-8">
            A modern full-stack application built with Nx monorepo
          </p>
          <div className="grid grid-cols-1 md:grid-cols-3 gap-8 mt-12">
            <div className="bg-white p-6 rounded-lg shadow-md">
              <h3 className="text-lg font-semibold mb-2">Web App</h3>
              <p className="text-gray-600">Next.js web application</p>
            </div>
            <div className="bg-white p-6 rounded-lg shadow-md">
              <h3 className="text-lg font-semibold mb-2">Mobile App</h3>
              <p className="text-gray-600">Expo React Native mobile app</p>
            </div>
            <div className="bg-white p-6 rounded-lg shadow-md">
              <h3 className="text-lg font-semibold mb-2">Desktop App</h3>
              <p className="text-gray-600">Electron desktop application</p>
            </div>
          </div>
        </div>
      </div>
    </div>
  )
}
"#;

const SHARED_UI: &str = r#"// Shared UI components for {{projectName}}

export interface ButtonProps {
  title: string
  onPress?: () => void
  variant?: 'primary' | 'secondary'
}

export const Button: React.FC<ButtonProps> = ({ title, onPress, variant = 'primary' }) => {
  // Rendering differs per platform (web, mobile, desktop)
  return null
}

export interface CardProps {
  children: React.ReactNode
  className?: string
}

export const Card: React.FC<CardProps> = ({ children, className }) => {
  return null
}
"#;

const SHARED_TYPES: &str = r#"// Shared TypeScript types for {{projectName}}

export interface User {
  id: string
  name: string
  email: string
  createdAt: Date
  updatedAt: Date
}

export interface ApiResponse<T = any> {
  success: boolean
  data?: T
  error?: string
  message?: string
}

export interface PaginatedResponse<T> extends ApiResponse<T[]> {
  pagination: {
    page: number
    limit: number
    total: number
    totalPages: number
  }
}
"#;

const BUSINESS_LOGIC: &str = r#"// Shared business logic for {{projectName}}

export class ApiClient {
  private baseUrl: string

  constructor(baseUrl: string) {
    this.baseUrl = baseUrl
  }

  async get<T>(endpoint: string): Promise<T> {
    const response = await fetch(`${this.baseUrl}${endpoint}`)
    return response.json()
  }

  async post<T>(endpoint: string, data: any): Promise<T> {
    const response = await fetch(`${this.baseUrl}${endpoint}`, {
      method: 'POST',
      headers: {
        'Content-Type': 'application/json',
      },
      body: JSON.stringify(data),
    })
    return response.json()
  }
}

export const createApiClient = (baseUrl: string) => new ApiClient(baseUrl)
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsconfig_paths_use_the_package_scope() {
        let t = nx_full_stack().unwrap();
        let ctx = GenerationContext::new("My App", "/tmp/my-app", t.constraints.clone(), t);
        let text = tsconfig_base(&ctx);
        assert!(text.contains("\"@my-app/shared-ui\""));
    }
}
