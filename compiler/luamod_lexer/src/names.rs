//! Static name tables.
//!
//! Two fixed sets drive identifier classification and renaming: the keyword
//! set (never an identifier, never a generated short name) and the global
//! allow-list (host-environment names that external code refers to by their
//! exact spelling, so they are never renamed). Both are immutable and passed
//! to each component by reference.

/// Keyword set and global allow-list.
///
/// Both slices must be sorted in byte order; lookups use binary search.
#[derive(Clone, Copy, Debug)]
pub struct NameTables {
    keywords: &'static [&'static str],
    globals: &'static [&'static str],
}

static LUA: NameTables = NameTables::new(LUA_KEYWORDS, LUA_GLOBALS);

impl NameTables {
    /// Build tables from sorted slices.
    pub const fn new(keywords: &'static [&'static str], globals: &'static [&'static str]) -> Self {
        Self { keywords, globals }
    }

    /// Lua 5.x keywords with the Luau extensions, and the Roblox/Lua
    /// runtime globals.
    pub fn lua() -> &'static NameTables {
        &LUA
    }

    #[inline]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.binary_search(&word).is_ok()
    }

    /// `true` when `word` is on the global allow-list.
    #[inline]
    pub fn is_global(&self, word: &str) -> bool {
        self.globals.binary_search(&word).is_ok()
    }

    /// Keyword or allow-listed global: a name no rename may produce or touch.
    #[inline]
    pub fn is_reserved(&self, word: &str) -> bool {
        self.is_keyword(word) || self.is_global(word)
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        self.keywords
    }

    pub fn globals(&self) -> &'static [&'static str] {
        self.globals
    }
}

const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "continue", "do", "else", "elseif", "end", "export", "false", "for",
    "function", "goto", "if", "import", "in", "local", "nil", "not", "or", "repeat", "return",
    "then", "true", "typeof", "until", "while",
];

const LUA_GLOBALS: &[&str] = &[
    // Roblox datatypes and services
    "Axes",
    "BadgeService",
    "BrickColor",
    "CFrame",
    "Color3",
    "ColorSequence",
    "ContextActionService",
    "DataStoreService",
    "Enum",
    "Faces",
    "HttpService",
    "Instance",
    "Lighting",
    "MarketplaceService",
    "MessagingService",
    "NumberRange",
    "NumberSequence",
    "PathWaypoint",
    "PhysicalProperties",
    "Players",
    "Random",
    "Ray",
    "Rect",
    "Region3",
    "ReplicatedStorage",
    "RunService",
    "ServerStorage",
    "SoundService",
    "StarterGui",
    "StarterPlayer",
    "TeleportService",
    "TweenInfo",
    "TweenService",
    "UDim2",
    "UserInputService",
    "Vector3",
    // Environment
    "_ENV",
    "_G",
    "_VERSION",
    // Lua runtime and Roblox globals
    "arg",
    "assert",
    "bit32",
    "collectgarbage",
    "coroutine",
    "debug",
    "delay",
    "elapsedTime",
    "error",
    "game",
    "gcinfo",
    "getfenv",
    "getmetatable",
    "io",
    "ipairs",
    "load",
    "loadstring",
    "math",
    "newproxy",
    "next",
    "os",
    "pairs",
    "pcall",
    "print",
    "rawequal",
    "rawget",
    "rawset",
    "require",
    "script",
    "select",
    "self",
    "setfenv",
    "setmetatable",
    "shared",
    "spawn",
    "string",
    "table",
    "task",
    "tick",
    "time",
    "tonumber",
    "tostring",
    "type",
    "unpack",
    "utf8",
    "wait",
    "warn",
    "workspace",
    "xpcall",
];
