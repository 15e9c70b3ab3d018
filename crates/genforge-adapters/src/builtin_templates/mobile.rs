//! Expo React Native app.

use serde_json::json;

use genforge_core::domain::{
    DomainError, GenerationContext, GenerationTemplate, TemplateCommand, TemplateDependency,
    TemplateFile, TemplateId, ValidationRule,
};

use super::pretty;
use crate::builtin_constraints;

pub fn expo_app() -> Result<GenerationTemplate, DomainError> {
    GenerationTemplate::builder()
        .id(TemplateId::new("expo-mobile-app")?)
        .name("Expo React Native App")
        .description("Cross-platform mobile app with Expo and TypeScript")
        .constraints(builtin_constraints::expo_mobile()?)
        .file(TemplateFile::generated("app.json", app_json))
        .file(TemplateFile::parameterized("App.tsx", APP_TSX))
        .file(TemplateFile::parameterized("src/screens/HomeScreen.tsx", HOME_SCREEN))
        .file(TemplateFile::parameterized(
            "src/navigation/AppNavigator.tsx",
            NAVIGATOR,
        ))
        .command(TemplateCommand::new(
            "npx create-expo-app {{projectName}} --template blank-typescript",
            "Create Expo app",
        ))
        .command(TemplateCommand::new(
            "npm install @react-navigation/native @react-navigation/stack",
            "Install navigation",
        ))
        .command(TemplateCommand::new(
            "npx expo install react-native-screens react-native-safe-area-context",
            "Install native dependencies",
        ))
        .dependencies([
            TemplateDependency::runtime("expo", "~51.0.0"),
            TemplateDependency::runtime("react", "18.2.0"),
            TemplateDependency::runtime("react-native", "0.74.5"),
            TemplateDependency::runtime("@react-navigation/native", "^6.0.0"),
            TemplateDependency::runtime("@react-navigation/stack", "^6.0.0"),
            TemplateDependency::dev("typescript", "^5.0.0"),
        ])
        .rule(ValidationRule::file_exists(
            "Expo configuration exists",
            ["app.json", "App.tsx"],
        ))
        .rule(ValidationRule::command_success(
            "App builds for development",
            "npx expo export",
        ))
        .build()
}

fn app_json(ctx: &GenerationContext) -> String {
    pretty(json!({
        "expo": {
            "name": ctx.project_name(),
            "slug": ctx.package_name(),
            "version": "1.0.0",
            "orientation": "portrait",
            "icon": "./assets/icon.png",
            "userInterfaceStyle": "light",
            "splash": {
                "image": "./assets/splash.png",
                "resizeMode": "contain",
                "backgroundColor": "#ffffff"
            },
            "assetBundlePatterns": ["**/*"],
            "ios": { "supportsTablet": true },
            "android": {
                "adaptiveIcon": {
                    "foregroundImage": "./assets/adaptive-icon.png",
                    "backgroundColor": "#ffffff"
                }
            },
            "web": { "favicon": "./assets/favicon.png" }
        }
    }))
}

/// Also used as the mobile app of the Nx monorepo.
pub(super) const APP_TSX: &str = r#"import React from 'react'
import { StatusBar } from 'expo-status-bar'
import { StyleSheet, Text, View } from 'react-native'

export default function App() {
  return (
    <View style={styles.container}>
      <Text style={styles.title}>Welcome to {{projectName}}</Text>
      <Text style={styles.subtitle}>Mobile App</Text>
      <StatusBar style="auto" />
    </View>
  )
}

const styles = StyleSheet.create({
  container: {
    flex: 1,
    backgroundColor: '#fff',
    alignItems: 'center',
    justifyContent: 'center',
    padding: 20,
  },
  title: {
    fontSize: 24,
    fontWeight: 'bold',
    marginBottom: 8,
    textAlign: 'center',
  },
  subtitle: {
    fontSize: 16,
    color: '#666',
    textAlign: 'center',
  },
})
"#;

const HOME_SCREEN: &str = r#"import React from 'react'
import { View, Text, StyleSheet } from 'react-native'

export default function HomeScreen() {
  return (
    <View style={styles.container}>
      <Text style={styles.title}>Home Screen</Text>
      <Text style={styles.subtitle}>Welcome to {{projectName}}</Text>
    </View>
  )
}

const styles = StyleSheet.create({
  container: {
    flex: 1,
    justifyContent: 'center',
    alignItems: 'center',
    backgroundColor: '#f5f5f5',
  },
  title: {
    fontSize: 24,
    fontWeight: 'bold',
    marginBottom: 16,
  },
  subtitle: {
    fontSize: 16,
    color: '#666',
  },
})
"#;

const NAVIGATOR: &str = r#"import React from 'react'
import { NavigationContainer } from '@react-navigation/native'
import { createStackNavigator } from '@react-navigation/stack'
import HomeScreen from '../screens/HomeScreen'

const Stack = createStackNavigator()

export default function AppNavigator() {
  return (
    <NavigationContainer>
      <Stack.Navigator initialRouteName="Home">
        <Stack.Screen
          name="Home"
          component={HomeScreen}
          options={{ title: '{{projectName}}' }}
        />
      </Stack.Navigator>
    </NavigationContainer>
  )
}
"#;
