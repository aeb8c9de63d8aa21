use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use resultbus::bridge::{ActivityResult, Intent, Parcelable, ResultLauncher, ACTION_GET_CONTENT, RESULT_OK};
use resultbus::event::{Event, PermissionsDeniedEvent};
use resultbus::log::LogLevel;
use resultbus::permission::{PermissionAsker, CAMERA};
use resultbus::platform::Platform;
use resultbus::{log, log_level, Config, Context, ScreenContext, ScreenId};

#[derive(Clone, Debug, Deserialize, Parcelable, Serialize)]
struct Cat {
    name: String,
    lives: u8,
}

#[derive(Debug, Event)]
struct OnCatChosen {
    cat: Cat,
}

#[derive(Debug, Event)]
struct OnImageChosen {
    uri: String,
}

#[derive(Debug, Event)]
struct OnCatsLoaded {
    names: Vec<String>,
}

#[derive(Debug, Event)]
struct OnFeedingTime;

/// Grants every permission it is asked for and remembers the last screen started.
struct SimulatedPlatform {
    granted: RefCell<HashSet<String>>,
    last_started: RefCell<Option<Vec<u8>>>,
}

impl SimulatedPlatform {
    fn new() -> Self {
        Self {
            granted: RefCell::new(HashSet::new()),
            last_started: RefCell::new(None),
        }
    }

    fn take_last_started(&self) -> Option<Intent> {
        let bytes = self.last_started.borrow_mut().take()?;
        Intent::from_bytes(&bytes).ok()
    }
}

impl Platform for SimulatedPlatform {
    fn get_sdk_level(&self) -> u32 {
        33
    }

    fn start_activity(&self, from: ScreenId, intent: &Intent) {
        log!(INFO, "{} starts {:?}", from, intent.get_component().or_else(|| intent.get_action()));
        match intent.to_bytes() {
            Ok(bytes) => *self.last_started.borrow_mut() = Some(bytes),
            Err(error) => log!(ERROR, "Can't marshal intent: {}", error),
        }
    }

    fn check_self_permission(&self, permission: &str) -> bool {
        self.granted.borrow().contains(permission)
    }

    fn should_show_rationale(&self, _screen: ScreenId, _permission: &str) -> bool {
        false
    }

    fn request_permissions(&self, screen: ScreenId, permissions: &[String]) {
        log!(INFO, "{} asks for {:?}, the user says yes", screen, permissions);
        self.granted.borrow_mut().extend(permissions.iter().cloned());
    }

    fn show_toast(&self, screen: ScreenId, message: &str) {
        log!(INFO, "[toast on {}] {}", screen, message);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let platform = Rc::new(SimulatedPlatform::new());
    let config = Config {
        log_level: LogLevel::INFO,
        package_name: "com.example.cats".to_string(),
        ..Config::default()
    };
    let context = Context::new(platform.clone(), config);

    let main_screen = context.on_screen_created();
    context.on_screen_post_resumed(main_screen);

    context.bus.register(main_screen, |event: &OnCatChosen| {
        log!(INFO, "Main screen got {} ({} lives)", event.cat.name, event.cat.lives);
    });

    // The cat list only opens once the camera permission is granted
    let opener_platform = platform.clone();
    PermissionAsker::new(&[CAMERA])
        .on_granted(move || opener_platform.start_activity(main_screen, &Intent::for_component("CatListScreen")))
        .ask(&context, &ScreenContext::from(main_screen).wrap())?;
    context.bus.register(main_screen, |_: &PermissionsDeniedEvent| log!(ERROR, "No camera, no cats"));
    context.on_request_permissions_result(main_screen);

    let cat_list = match platform.take_last_started() {
        Some(intent) if intent.get_component() == Some("CatListScreen") => {
            context.on_screen_paused(main_screen);
            let cat_list = context.on_screen_created();
            context.on_screen_post_resumed(cat_list);
            cat_list
        },
        _ => anyhow::bail!("Cat list was never opened"),
    };

    context.bus.register(cat_list, |event: &OnCatsLoaded| {
        log!(INFO, "Cat list shows {:?}", event.names);
    });
    let poster = context.bus.poster();
    let loader = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        poster.post(OnCatsLoaded { names: vec!["Tom".to_string(), "Felix".to_string()] });
    });
    while context.bus.wait(Duration::from_millis(200)) == 0 { }
    if loader.join().is_err() {
        anyhow::bail!("Loader thread panicked");
    }

    // Main screen is paused, so this waits until it resumes
    context.bus.post(OnCatChosen { cat: Cat { name: "Tom".to_string(), lives: 9 } });
    context.on_screen_destroyed(cat_list);
    context.on_screen_post_resumed(main_screen);

    // Pick a picture of the chosen cat from an external gallery
    context.bus.register(main_screen, |event: &OnImageChosen| log!(INFO, "Main screen shows {}", event.uri));
    ResultLauncher::new()
        .add_result_mapper(RESULT_OK, |data: Option<&Intent>| {
            if let Some(cat) = data.and_then(|d| d.get_parcel::<Cat>("cat")) {
                log!(INFO, "Gallery handed back {}", cat.name);
            }
            data.and_then(|d| d.get_data()).map(|uri| OnImageChosen { uri: uri.to_string() })
        })
        .on_stopped(|| {
            log!(INFO, "Gallery closed");
            Ok(())
        })
        .start(&context, &main_screen.into(), Intent::new().with_action(ACTION_GET_CONTENT).with_type("image/*"))?;

    context.on_screen_paused(main_screen);
    let picked = Intent::new()
        .with_data("content://gallery/tom.png")
        .put_parcel("cat", Cat { name: "Tom".to_string(), lives: 9 });
    context.on_activity_result(main_screen, ActivityResult::ok(Intent::from_bytes(&picked.to_bytes()?)?))?;
    context.on_screen_post_resumed(main_screen);

    // The delay only starts counting once the screen can receive the event
    context.bus.register(main_screen, |_: &OnFeedingTime| log!(INFO, "Time to feed Tom"));
    context.on_screen_paused(main_screen);
    context.bus.post_delayed(OnFeedingTime, Duration::from_millis(100));
    context.on_screen_post_resumed(main_screen);
    while context.bus.get_next_deadline().is_some() {
        context.bus.wait(Duration::from_millis(200));
    }

    // Show what teardown evicts
    log_level!(VERBOSE);
    context.on_screen_destroyed(main_screen);
    log!(INFO, "Done: {:?}", context);

    Ok(())
}
