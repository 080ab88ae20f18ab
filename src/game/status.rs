// Observable player status
//
// Holds the values the HUD cares about: selected skin, health, and the
// hurt/kicking flags. Setters only notify listeners when a value actually
// changes.

use std::fmt;

/// Selectable dino sprite sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DinoSkin {
    #[default]
    Vita,
    Mort,
    Tard,
    Doux,
}

impl DinoSkin {
    pub const ALL: [DinoSkin; 4] = [Self::Vita, Self::Mort, Self::Tard, Self::Doux];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Vita => "vita",
            Self::Mort => "mort",
            Self::Tard => "tard",
            Self::Doux => "doux",
        }
    }

    #[allow(dead_code)]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Sprite sheet file for this skin
    pub fn sheet_path(&self) -> String {
        format!("public/DinoSprites - {}.png", self.name())
    }

    /// Next skin in the rotation
    pub fn next(&self) -> Self {
        match self {
            Self::Vita => Self::Mort,
            Self::Mort => Self::Tard,
            Self::Tard => Self::Doux,
            Self::Doux => Self::Vita,
        }
    }
}

impl fmt::Display for DinoSkin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single change to the status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Skin(DinoSkin),
    Health { old: i32, new: i32 },
    Hurt(bool),
    Kicking(bool),
}

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&StatusChange)>;

pub struct PlayerStatus {
    skin: DinoSkin,
    health: i32,
    max_health: i32,
    hurt: bool,
    kicking: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl fmt::Debug for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerStatus")
            .field("skin", &self.skin)
            .field("health", &self.health)
            .field("hurt", &self.hurt)
            .field("kicking", &self.kicking)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PlayerStatus {
    pub fn new(max_health: i32) -> Self {
        Self {
            skin: DinoSkin::default(),
            health: max_health,
            max_health,
            hurt: false,
            kicking: false,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn skin(&self) -> DinoSkin {
        self.skin
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    #[allow(dead_code)]
    pub fn is_hurt(&self) -> bool {
        self.hurt
    }

    #[allow(dead_code)]
    pub fn is_kicking(&self) -> bool {
        self.kicking
    }

    /// Register a listener for every future change
    pub fn subscribe(&mut self, listener: impl FnMut(&StatusChange) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn set_skin(&mut self, skin: DinoSkin) -> bool {
        if self.skin == skin {
            return false;
        }
        self.skin = skin;
        self.emit(StatusChange::Skin(skin));
        true
    }

    /// Subtract `amount`, never going below zero. Returns the new health if it changed.
    pub fn take_damage(&mut self, amount: i32) -> Option<i32> {
        let new = (self.health - amount.max(0)).max(0);
        self.set_health(new)
    }

    /// Restore full health
    pub fn reset_health(&mut self) -> Option<i32> {
        self.set_health(self.max_health)
    }

    pub fn set_hurt(&mut self, hurt: bool) -> bool {
        if self.hurt == hurt {
            return false;
        }
        self.hurt = hurt;
        self.emit(StatusChange::Hurt(hurt));
        true
    }

    pub fn set_kicking(&mut self, kicking: bool) -> bool {
        if self.kicking == kicking {
            return false;
        }
        self.kicking = kicking;
        self.emit(StatusChange::Kicking(kicking));
        true
    }

    fn set_health(&mut self, health: i32) -> Option<i32> {
        let new = health.clamp(0, self.max_health);
        if new == self.health {
            return None;
        }
        let old = std::mem::replace(&mut self.health, new);
        self.emit(StatusChange::Health { old, new });
        Some(new)
    }

    fn emit(&mut self, change: StatusChange) {
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorded(status: &mut PlayerStatus) -> Rc<RefCell<Vec<StatusChange>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        status.subscribe(move |c| sink.borrow_mut().push(*c));
        log
    }

    #[test]
    fn test_initial_status() {
        let status = PlayerStatus::new(100);
        assert_eq!(status.health(), 100);
        assert_eq!(status.skin(), DinoSkin::Vita);
        assert!(!status.is_hurt());
        assert!(!status.is_kicking());
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut status = PlayerStatus::new(100);
        assert_eq!(status.take_damage(30), Some(70));
        assert_eq!(status.take_damage(500), Some(0));
        assert_eq!(status.take_damage(10), None);
        assert_eq!(status.health(), 0);
    }

    #[test]
    fn test_negative_damage_cannot_heal() {
        let mut status = PlayerStatus::new(100);
        status.take_damage(20);
        assert_eq!(status.take_damage(-50), None);
        assert_eq!(status.health(), 80);
    }

    #[test]
    fn test_reset_restores_max() {
        let mut status = PlayerStatus::new(100);
        status.take_damage(40);
        assert_eq!(status.reset_health(), Some(100));
        assert_eq!(status.reset_health(), None);
    }

    #[test]
    fn test_listeners_only_see_real_changes() {
        let mut status = PlayerStatus::new(100);
        let log = recorded(&mut status);

        status.set_hurt(true);
        status.set_hurt(true);
        status.take_damage(10);
        status.set_skin(DinoSkin::Vita);
        status.set_skin(DinoSkin::Doux);

        assert_eq!(
            *log.borrow(),
            vec![
                StatusChange::Hurt(true),
                StatusChange::Health { old: 100, new: 90 },
                StatusChange::Skin(DinoSkin::Doux),
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let mut status = PlayerStatus::new(100);
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let id = status.subscribe(move |_| *c.borrow_mut() += 1);

        status.set_kicking(true);
        assert!(status.unsubscribe(id));
        assert!(!status.unsubscribe(id));
        status.set_kicking(false);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_skin_names() {
        assert_eq!(DinoSkin::from_name("MORT"), Some(DinoSkin::Mort));
        assert_eq!(DinoSkin::from_name("rex"), None);
        assert_eq!(DinoSkin::Tard.sheet_path(), "public/DinoSprites - tard.png");
        assert_eq!(DinoSkin::Doux.next(), DinoSkin::Vita);
    }
}
