use crate::config::AppConfig;
use crate::model::{IconSettings, OpenMethod, SidebarSettings};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsDomain {
    IconSettings,
    OpenMethod,
    Sidebar,
}

impl SettingsDomain {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingsDomain::IconSettings => "icon-settings",
            SettingsDomain::OpenMethod => "open-method",
            SettingsDomain::Sidebar => "sidebar",
        }
    }
}

/// Typed fan-out: every live subscriber receives each published value. Subscribers whose
/// receiver was dropped are pruned on the next publish.
pub struct Subject<T> {
    subscribers: Vec<Sender<T>>,
}

impl<T> Default for Subject<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<T: Clone> Subject<T> {
    pub fn subscribe(&mut self) -> Receiver<T> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, value: &T) {
        self.subscribers.retain(|tx| tx.send(value.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Owns the user's appearance and behaviour settings. Writers go through the `set_*`
/// methods, which persist and then notify; readers subscribe per domain.
pub struct SettingsBridge {
    config: AppConfig,
    config_path: Option<PathBuf>,
    icon: Subject<IconSettings>,
    open_method: Subject<OpenMethod>,
    sidebar: Subject<SidebarSettings>,
}

impl SettingsBridge {
    /// Persists every change to `config_path`.
    pub fn persistent(config: AppConfig, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path: Some(config_path),
            icon: Subject::default(),
            open_method: Subject::default(),
            sidebar: Subject::default(),
        }
    }

    /// Keeps changes in memory only.
    pub fn detached(config: AppConfig) -> Self {
        Self {
            config,
            config_path: None,
            icon: Subject::default(),
            open_method: Subject::default(),
            sidebar: Subject::default(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn icon_settings(&self) -> IconSettings {
        self.config.icon_settings.clone()
    }

    pub fn open_method(&self) -> OpenMethod {
        self.config.open_method
    }

    pub fn sidebar(&self) -> SidebarSettings {
        self.config.sidebar.clone()
    }

    pub fn subscribe_icon_settings(&mut self) -> Receiver<IconSettings> {
        self.icon.subscribe()
    }

    pub fn subscribe_open_method(&mut self) -> Receiver<OpenMethod> {
        self.open_method.subscribe()
    }

    pub fn subscribe_sidebar(&mut self) -> Receiver<SidebarSettings> {
        self.sidebar.subscribe()
    }

    pub fn set_icon_settings(&mut self, settings: IconSettings) {
        if self.config.icon_settings == settings {
            return;
        }
        self.config.icon_settings = settings;
        self.persist(SettingsDomain::IconSettings);
        self.icon.publish(&self.config.icon_settings);
    }

    pub fn set_open_method(&mut self, method: OpenMethod) {
        if self.config.open_method == method {
            return;
        }
        self.config.open_method = method;
        self.persist(SettingsDomain::OpenMethod);
        self.open_method.publish(&method);
    }

    pub fn set_sidebar(&mut self, sidebar: SidebarSettings) {
        if self.config.sidebar == sidebar {
            return;
        }
        self.config.sidebar = sidebar;
        self.persist(SettingsDomain::Sidebar);
        self.sidebar.publish(&self.config.sidebar);
    }

    /// For config fields that have no subscribers (window size, active category, flags).
    pub fn update_config(&mut self, update: impl FnOnce(&mut AppConfig)) {
        let before = self.config.clone();
        update(&mut self.config);
        if self.config != before {
            if let Some(path) = &self.config_path {
                self.config.save_to(path);
            }
        }
    }

    fn persist(&self, domain: SettingsDomain) {
        debug!("{} changed", domain.as_str());
        if let Some(path) = &self.config_path {
            self.config.save_to(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_full_record() {
        let mut bridge = SettingsBridge::detached(AppConfig::default());
        let first = bridge.subscribe_icon_settings();
        let second = bridge.subscribe_icon_settings();

        let mut updated = bridge.icon_settings();
        updated.icon_size = 80.0;
        bridge.set_icon_settings(updated.clone());

        assert_eq!(first.try_recv().ok(), Some(updated.clone()));
        assert_eq!(second.try_recv().ok(), Some(updated));
    }

    #[test]
    fn unchanged_values_are_not_published() {
        let mut bridge = SettingsBridge::detached(AppConfig::default());
        let rx = bridge.subscribe_open_method();
        bridge.set_open_method(bridge.open_method());
        assert!(rx.try_recv().is_err());
        bridge.set_open_method(OpenMethod::CurrentTab);
        assert_eq!(rx.try_recv().ok(), Some(OpenMethod::CurrentTab));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut subject: Subject<u32> = Subject::default();
        let kept = subject.subscribe();
        drop(subject.subscribe());
        subject.publish(&7);
        assert_eq!(subject.subscriber_count(), 1);
        assert_eq!(kept.try_recv().ok(), Some(7));
    }

    #[test]
    fn persistent_bridge_writes_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let mut bridge = SettingsBridge::persistent(AppConfig::default(), path.clone());
        bridge.set_sidebar(SidebarSettings {
            visible: false,
            width: 64.0,
        });
        bridge.update_config(|config| config.active_category = Some("dev".to_string()));

        let reloaded = AppConfig::load_from(&path);
        assert!(!reloaded.sidebar.visible);
        assert_eq!(reloaded.active_category.as_deref(), Some("dev"));
    }
}
