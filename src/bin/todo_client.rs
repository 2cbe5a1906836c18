//! 终端版待办事项表单
//!
//! 通过 `TODO_API_URL` 指定服务地址（默认 http://localhost:3001）。

use anyhow::Result;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::Level;

use todo_service::client::{ApiClient, TodoApi, TodoForm};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let api = ApiClient::from_env()?;
    println!("连接到 {}", api.base_url());

    let mut form = TodoForm::new(api);
    form.load().await;
    print!("{}", form.render());
    print_usage();

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => continue,
            "add" => {
                let (title, description) = rest.split_once('|').unwrap_or((rest, ""));
                form.set_title(title);
                form.set_description(description);
                form.submit().await;
            }
            "edit" => match item_id(&form, rest) {
                Some(id) => {
                    form.begin_edit(id);
                }
                None => println!("没有这个序号: {}", rest),
            },
            "title" => form.set_edit_title(rest),
            "desc" => form.set_edit_description(rest),
            "save" => form.save_edit().await,
            "cancel" => form.cancel_edit(),
            "delete" => match item_id(&form, rest) {
                Some(id) => {
                    let title = form
                        .items()
                        .iter()
                        .find(|todo| todo.id == id)
                        .map(|todo| todo.title.clone())
                        .unwrap_or_default();
                    stdout
                        .write_all(format!("确定删除 \"{}\"? [y/N] ", title).as_bytes())
                        .await?;
                    stdout.flush().await?;

                    let answer = lines.next_line().await?.unwrap_or_default();
                    let confirmed = matches!(answer.trim(), "y" | "Y" | "yes");
                    form.delete(id, |_| confirmed).await;
                }
                None => println!("没有这个序号: {}", rest),
            },
            "reload" => form.load().await,
            "help" => {
                print_usage();
                continue;
            }
            "quit" | "exit" => break,
            other => {
                println!("未知命令: {}", other);
                continue;
            }
        }

        print!("{}", form.render());
    }

    Ok(())
}

/// 把 1 开始的序号换成条目 id
fn item_id<A: TodoApi>(form: &TodoForm<A>, raw: &str) -> Option<uuid::Uuid> {
    let index: usize = raw.parse().ok()?;
    form.items().get(index.checked_sub(1)?).map(|todo| todo.id)
}

fn print_usage() {
    println!("命令:");
    println!("  add <标题> [| <描述>]  添加待办事项");
    println!("  edit <序号>            编辑条目");
    println!("  title <文本>           修改编辑中的标题");
    println!("  desc <文本>            修改编辑中的描述");
    println!("  save / cancel          保存或取消编辑");
    println!("  delete <序号>          删除条目");
    println!("  reload                 重新加载列表");
    println!("  quit                   退出");
}
